use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::document::Document;

/// One tagged item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagHit {
    pub document_id: Uuid,
    pub item_id: Uuid,
}

/// Tags extracted from item text across a set of documents.
///
/// Names are kept exactly as written; lookups ignore case.
#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    names: BTreeSet<String>,
    hits: HashMap<String, Vec<TagHit>>,
}

impl TagIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn build(documents: &[Document]) -> Self {
        let mut index = Self::new();
        for doc in documents {
            index.index_document(doc);
        }
        index
    }

    pub fn index_document(&mut self, doc: &Document) {
        for item in doc.items() {
            let hit = TagHit {
                document_id: doc.id(),
                item_id: item.id,
            };
            for tag in item.tags() {
                let hits = self.hits.entry(tag.to_lowercase()).or_default();
                // An item repeating a tag still counts once
                if hits.last() != Some(&hit) {
                    hits.push(hit);
                }
                self.names.insert(tag);
            }
        }
    }

    /// Distinct tag names, sorted
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Items carrying `tag` (any case), in document order
    #[must_use]
    pub fn hits(&self, tag: &str) -> &[TagHit] {
        self.hits
            .get(&tag.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tag_tests {
    use super::*;
    use crate::{formats::FileFormat, models::Item};

    fn doc(title: &str, texts: &[&str]) -> Document {
        let mut doc = Document::new(title, FileFormat::PlainText);
        doc.insert_items(None, texts.iter().map(|t| Item::checkbox(*t)).collect());
        doc
    }

    #[test]
    fn test_tags_sorted_and_distinct() {
        let docs = vec![
            doc("A", &["call @mom @home", "@work stuff"]),
            doc("B", &["fix sink @home"]),
        ];
        let index = TagIndex::build(&docs);
        assert_eq!(index.tags(), vec!["home", "mom", "work"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_case_variants_listed_separately() {
        let docs = vec![doc("A", &["@Home", "@home"])];
        let index = TagIndex::build(&docs);
        assert_eq!(index.tags(), vec!["Home", "home"]);
        assert_eq!(index.hits("HOME").len(), 2);
    }

    #[test]
    fn test_hits_point_at_items() {
        let docs = vec![doc("A", &["x @tag @tag", "y"]), doc("B", &["z @TAG"])];
        let index = TagIndex::build(&docs);
        let hits = index.hits("tag");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document_id, docs[0].id());
        assert_eq!(hits[0].item_id, docs[0].items()[0].id);
        assert_eq!(hits[1].document_id, docs[1].id());
        assert!(index.hits("missing").is_empty());
    }
}
