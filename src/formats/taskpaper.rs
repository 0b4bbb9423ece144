//! TaskPaper lists (`.taskpaper`).
//!
//! - projects end with `:` and become headings
//! - tasks start with `- ` and become checkboxes; `@done` anywhere marks them
//!   completed
//! - `* ` lines are bullets, everything else is a note (plain item)
//! - one tab per indent level

use crate::{
    formats::{ListCodec, content_lines, join_lines, strip_tabs},
    models::{Item, ItemKind, Items},
};

const TASK_PREFIX: &str = "- ";
const BULLET_PREFIX: &str = "* ";
const PROJECT_SUFFIX: char = ':';
const DONE_TAG: &str = " @done";

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskPaperCodec;

impl ListCodec for TaskPaperCodec {
    fn encode(&self, items: &[Item]) -> String {
        join_lines(items, encode_item)
    }

    fn decode(&self, text: &str) -> Items {
        content_lines(text).map(decode_line).collect()
    }
}

fn encode_item(item: &Item) -> String {
    let indent = "\t".repeat(item.indent_level);
    let text = &item.text;
    match item.kind {
        ItemKind::Heading => format!("{indent}{text}{PROJECT_SUFFIX}"),
        ItemKind::Checkbox => {
            let done = if item.completed { DONE_TAG } else { "" };
            format!("{indent}{TASK_PREFIX}{text}{done}")
        }
        ItemKind::Bullet => format!("{indent}{BULLET_PREFIX}{text}"),
        ItemKind::Plain => format!("{indent}{text}"),
    }
}

/// A project line ends with `:` and carries no tag at all, so a line like
/// `email @done:` stays a note.
fn project_title(content: &str) -> Option<&str> {
    if content.contains('@') {
        return None;
    }
    content.trim_end().strip_suffix(PROJECT_SUFFIX)
}

fn decode_line(line: &str) -> Item {
    let (indent_level, content) = strip_tabs(line);

    let (kind, text) = if let Some(rest) = content.strip_prefix(TASK_PREFIX) {
        (ItemKind::Checkbox, rest)
    } else if let Some(rest) = content.strip_prefix(BULLET_PREFIX) {
        (ItemKind::Bullet, rest)
    } else if let Some(title) = project_title(content) {
        (ItemKind::Heading, title)
    } else {
        (ItemKind::Plain, content)
    };

    // Unlike the plain text format the tag may sit anywhere in the task
    let item = if kind == ItemKind::Checkbox && text.contains(DONE_TAG) {
        Item::new(kind, text.replace(DONE_TAG, "")).with_completed(true)
    } else {
        Item::new(kind, text)
    };

    item.with_indent(indent_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Items {
        TaskPaperCodec.decode(text)
    }

    fn encode(items: &[Item]) -> String {
        TaskPaperCodec.encode(items)
    }

    #[test]
    fn encode_each_kind() {
        assert_eq!(encode(&[Item::heading("Packing")]), "Packing:");
        assert_eq!(encode(&[Item::checkbox("buy eggs")]), "- buy eggs");
        assert_eq!(
            encode(&[Item::checkbox("buy eggs").with_completed(true)]),
            "- buy eggs @done"
        );
        assert_eq!(encode(&[Item::bullet("note")]), "* note");
        assert_eq!(encode(&[Item::plain("just text")]), "just text");
    }

    #[test]
    fn encode_indented() {
        let items = vec![
            Item::heading("Errands"),
            Item::checkbox("groceries").with_indent(1),
        ];
        assert_eq!(encode(&items), "Errands:\n\t- groceries");
    }

    #[test]
    fn decode_project_as_heading() {
        let items = decode("Packing:");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ItemKind::Heading);
        assert_eq!(items[0].text, "Packing");
    }

    #[test]
    fn decode_project_with_trailing_space() {
        let items = decode("Errands:  ");
        assert_eq!(items[0].kind, ItemKind::Heading);
        assert_eq!(items[0].text, "Errands");
    }

    #[test]
    fn colon_with_tag_is_not_a_project() {
        let items = decode("email @done:");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ItemKind::Plain);
        assert_eq!(items[0].text, "email @done:");
        assert!(!items[0].completed);

        let items = decode("meeting @work:");
        assert_eq!(items[0].kind, ItemKind::Plain);
    }

    #[test]
    fn decode_tasks() {
        let items = decode("- buy eggs\n- buy milk @done");
        assert!(items.iter().all(Item::is_checkbox));
        assert!(!items[0].completed);
        assert!(items[1].completed);
        assert_eq!(items[1].text, "buy milk");
    }

    #[test]
    fn done_tag_anywhere_in_task() {
        let items = decode("- call bob @done(2024-01-02) @home");
        assert!(items[0].completed);
        assert_eq!(items[0].text, "call bob(2024-01-02) @home");

        let items = decode("- twice @done and @done");
        assert!(items[0].completed);
        assert_eq!(items[0].text, "twice and");
    }

    #[test]
    fn done_tag_left_alone_outside_tasks() {
        let items = decode("* shipped @done\nwrote report @done");
        assert_eq!(items[0].text, "shipped @done");
        assert_eq!(items[1].text, "wrote report @done");
        assert!(items.iter().all(|i| !i.completed));
    }

    #[test]
    fn decode_bullet() {
        let items = decode("* note");
        assert_eq!(items[0].kind, ItemKind::Bullet);
        assert_eq!(items[0].text, "note");
    }

    #[test]
    fn decode_indentation() {
        let items = decode("Errands:\n\t- groceries\n\t\tpick up @store");
        let levels: Vec<_> = items.iter().map(|i| i.indent_level).collect();
        assert_eq!(levels, vec![0, 1, 2]);
        assert_eq!(items[2].kind, ItemKind::Plain);
    }

    #[test]
    fn round_trip_all_kinds() {
        let original = vec![
            Item::heading("Shopping"),
            Item::bullet("milk"),
            Item::checkbox("eggs"),
            Item::checkbox("bread").with_completed(true),
            Item::plain("note"),
            Item::checkbox("sub-item").with_indent(1),
            Item::heading("Time: 10").with_indent(1),
        ];
        let decoded = decode(&encode(&original));
        assert_eq!(decoded.len(), original.len());
        for (orig, item) in original.iter().zip(&decoded) {
            assert!(orig.same_outline(item), "{orig:?} != {item:?}");
        }
    }
}
