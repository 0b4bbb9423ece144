//! Plain text lists (`.txt`).
//!
//! One item per line, one tab per indent level:
//! - `# ` heading
//! - `* ` bullet
//! - `- ` checkbox, `- text @done` when completed
//! - anything else is plain text

use crate::{
    formats::{ListCodec, content_lines, join_lines, strip_tabs},
    models::{Item, ItemKind, Items},
};

const CHECKBOX_PREFIX: &str = "- ";
const BULLET_PREFIX: &str = "* ";
const HEADING_PREFIX: &str = "# ";
const DONE_SUFFIX: &str = " @done";

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextCodec;

impl ListCodec for PlainTextCodec {
    fn encode(&self, items: &[Item]) -> String {
        join_lines(items, encode_item)
    }

    fn decode(&self, text: &str) -> Items {
        content_lines(text).map(decode_line).collect()
    }
}

fn encode_item(item: &Item) -> String {
    let indent = "\t".repeat(item.indent_level);
    let prefix = match item.kind {
        ItemKind::Heading => HEADING_PREFIX,
        ItemKind::Bullet => BULLET_PREFIX,
        ItemKind::Checkbox => CHECKBOX_PREFIX,
        ItemKind::Plain => "",
    };
    let suffix = if item.is_done() { DONE_SUFFIX } else { "" };
    format!("{indent}{prefix}{}{suffix}", item.text)
}

fn decode_line(line: &str) -> Item {
    let (indent_level, content) = strip_tabs(line);

    let (kind, text) = if let Some(rest) = content.strip_prefix(CHECKBOX_PREFIX) {
        (ItemKind::Checkbox, rest)
    } else if let Some(rest) = content.strip_prefix(BULLET_PREFIX) {
        (ItemKind::Bullet, rest)
    } else if let Some(rest) = content.strip_prefix(HEADING_PREFIX) {
        (ItemKind::Heading, rest)
    } else {
        (ItemKind::Plain, content)
    };

    // Completion is a suffix check, and only for checkboxes
    let (text, completed) = match (kind, text.strip_suffix(DONE_SUFFIX)) {
        (ItemKind::Checkbox, Some(stripped)) => (stripped, true),
        _ => (text, false),
    };

    Item::new(kind, text)
        .with_indent(indent_level)
        .with_completed(completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Items {
        PlainTextCodec.decode(text)
    }

    fn encode(items: &[Item]) -> String {
        PlainTextCodec.encode(items)
    }

    #[test]
    fn encode_each_kind() {
        assert_eq!(encode(&[Item::heading("Packing")]), "# Packing");
        assert_eq!(encode(&[Item::plain("just text")]), "just text");
        assert_eq!(encode(&[Item::bullet("milk")]), "* milk");
        assert_eq!(encode(&[Item::checkbox("buy eggs")]), "- buy eggs");
        assert_eq!(
            encode(&[Item::checkbox("buy eggs").with_completed(true)]),
            "- buy eggs @done"
        );
    }

    #[test]
    fn encode_indented_outline() {
        let items = vec![
            Item::heading("Clothes"),
            Item::checkbox("shirts").with_indent(1),
            Item::checkbox("dress shirts").with_indent(2),
        ];
        assert_eq!(encode(&items), "# Clothes\n\t- shirts\n\t\t- dress shirts");
    }

    #[test]
    fn encode_mixed() {
        let items = vec![
            Item::heading("Shopping"),
            Item::bullet("milk"),
            Item::checkbox("eggs"),
            Item::plain("note to self"),
        ];
        assert_eq!(encode(&items), "# Shopping\n* milk\n- eggs\nnote to self");
    }

    #[test]
    fn completion_not_emitted_for_other_kinds() {
        let items = vec![
            Item::bullet("milk").with_completed(true),
            Item::plain("note").with_completed(true),
        ];
        assert_eq!(encode(&items), "* milk\nnote");
    }

    #[test]
    fn decode_each_kind() {
        let items = decode("# Packing\njust text\n* milk\n- buy eggs");
        let kinds: Vec<_> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ItemKind::Heading,
                ItemKind::Plain,
                ItemKind::Bullet,
                ItemKind::Checkbox
            ]
        );
        assert_eq!(items[0].text, "Packing");
        assert_eq!(items[1].text, "just text");
        assert_eq!(items[2].text, "milk");
        assert_eq!(items[3].text, "buy eggs");
        assert!(!items[3].completed);
    }

    #[test]
    fn decode_completed_checkbox() {
        let items = decode("- buy eggs @done");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ItemKind::Checkbox);
        assert_eq!(items[0].text, "buy eggs");
        assert!(items[0].completed);
    }

    #[test]
    fn done_marker_only_counts_as_suffix() {
        let items = decode("- @done first");
        assert!(!items[0].completed);
        assert_eq!(items[0].text, "@done first");
    }

    #[test]
    fn done_marker_ignored_outside_checkboxes() {
        let items = decode("* milk @done\nnote @done");
        assert_eq!(items[0].text, "milk @done");
        assert_eq!(items[1].text, "note @done");
        assert!(items.iter().all(|i| !i.completed));
    }

    #[test]
    fn decode_indentation_from_tabs() {
        let items = decode("# Clothes\n\t- shirts\n\t\t- dress shirts");
        let levels: Vec<_> = items.iter().map(|i| i.indent_level).collect();
        assert_eq!(levels, vec![0, 1, 2]);
    }

    #[test]
    fn spaces_are_not_indentation() {
        let items = decode("    - shirts");
        assert_eq!(items[0].indent_level, 0);
        assert_eq!(items[0].kind, ItemKind::Plain);
        assert_eq!(items[0].text, "    - shirts");
    }

    #[test]
    fn only_single_hash_is_heading() {
        let items = decode("## Sub\n#tag");
        assert!(items.iter().all(Item::is_plain));
        assert_eq!(items[0].text, "## Sub");
    }

    #[test]
    fn empty_lines_are_dropped() {
        let items = decode("- a\n\n\n- b\n");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn round_trip_all_kinds() {
        let original = vec![
            Item::heading("Shopping"),
            Item::bullet("milk"),
            Item::checkbox("eggs"),
            Item::checkbox("got bread").with_completed(true),
            Item::plain("note"),
            Item::checkbox("sub-item").with_indent(1),
            Item::heading("Sleep & Medicine").with_indent(2),
        ];
        let decoded = decode(&encode(&original));
        assert_eq!(decoded.len(), original.len());
        for (orig, item) in original.iter().zip(&decoded) {
            assert!(orig.same_outline(item), "{orig:?} != {item:?}");
        }
    }
}
