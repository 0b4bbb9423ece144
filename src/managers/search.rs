use uuid::Uuid;

use crate::{document::Document, managers::tags::TagIndex, models::Items};

/// A document that matched a query, with the items that matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub document_id: Uuid,
    pub title: String,
    /// Empty when only the title matched
    pub matching_items: Items,
}

/// Case-insensitive substring search over titles and item text.
///
/// An empty query matches nothing.
#[must_use]
pub fn search(documents: &[Document], query: &str) -> Vec<SearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    documents
        .iter()
        .filter_map(|doc| {
            let matching_items: Items = doc
                .items()
                .iter()
                .filter(|item| item.text.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            let title_match = doc.title().to_lowercase().contains(&needle);

            (title_match || !matching_items.is_empty()).then(|| SearchHit {
                document_id: doc.id(),
                title: doc.title().to_string(),
                matching_items,
            })
        })
        .collect()
}

/// Documents holding items tagged `tag` (any case), with those items
#[must_use]
pub fn filter_by_tag(documents: &[Document], tag: &str) -> Vec<SearchHit> {
    let index = TagIndex::build(documents);
    let hits = index.hits(tag);

    documents
        .iter()
        .filter_map(|doc| {
            let matching_items: Items = hits
                .iter()
                .filter(|hit| hit.document_id == doc.id())
                .filter_map(|hit| doc.item(hit.item_id).cloned())
                .collect();

            (!matching_items.is_empty()).then(|| SearchHit {
                document_id: doc.id(),
                title: doc.title().to_string(),
                matching_items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formats::FileFormat, models::Item};

    fn doc(title: &str, texts: &[&str]) -> Document {
        let mut doc = Document::new(title, FileFormat::PlainText);
        doc.insert_items(None, texts.iter().map(|t| Item::checkbox(*t)).collect());
        doc
    }

    fn library() -> Vec<Document> {
        vec![
            doc("Groceries", &["Milk", "eggs @store", "Oat milk"]),
            doc("Work", &["email boss @work", "review PR @work @urgent"]),
            doc("Milkshake ideas", &[]),
        ]
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(search(&library(), "").is_empty());
    }

    #[test]
    fn test_search_items_and_titles() {
        let hits = search(&library(), "MILK");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Groceries");
        let texts: Vec<_> = hits[0].matching_items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Milk", "Oat milk"]);

        assert_eq!(hits[1].title, "Milkshake ideas");
        assert!(hits[1].matching_items.is_empty());
    }

    #[test]
    fn test_search_no_match() {
        assert!(search(&library(), "zebra").is_empty());
    }

    #[test]
    fn test_filter_by_tag_ignores_case() {
        let hits = filter_by_tag(&library(), "WORK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Work");
        assert_eq!(hits[0].matching_items.len(), 2);

        let hits = filter_by_tag(&library(), "urgent");
        assert_eq!(hits[0].matching_items[0].text, "review PR @work @urgent");

        assert!(filter_by_tag(&library(), "home").is_empty());
    }
}
