//! Markdown task lists (`.md`).
//!
//! Only the list subset is understood: `- [ ]`/`- [x]` checkboxes, `-`/`*`
//! bullets and `#` headings. Inline emphasis stays in the text untouched.
//!
//! Indentation is read as one level per leading tab, or, when the line does
//! not start with a tab, one level per two leading spaces. It is always
//! written back as two spaces per level.

use crate::{
    formats::{ListCodec, content_lines, join_lines},
    models::{Item, ItemKind, Items},
};

const INDENT_UNIT: &str = "  ";
const DONE_PREFIXES: [&str; 2] = ["- [x] ", "- [X] "];
const OPEN_PREFIX: &str = "- [ ] ";
const BULLET_PREFIXES: [&str; 2] = ["- ", "* "];
const HEADING_PREFIX: &str = "## ";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCodec;

impl ListCodec for MarkdownCodec {
    fn encode(&self, items: &[Item]) -> String {
        join_lines(items, encode_item)
    }

    fn decode(&self, text: &str) -> Items {
        content_lines(text).map(decode_line).collect()
    }
}

fn encode_item(item: &Item) -> String {
    let indent = INDENT_UNIT.repeat(item.indent_level);
    let prefix = match item.kind {
        ItemKind::Heading => HEADING_PREFIX,
        ItemKind::Checkbox if item.completed => DONE_PREFIXES[0],
        ItemKind::Checkbox => OPEN_PREFIX,
        ItemKind::Bullet => BULLET_PREFIXES[0],
        ItemKind::Plain => "",
    };
    format!("{indent}{prefix}{}", item.text)
}

fn indent_level(line: &str) -> usize {
    let tabs = line.chars().take_while(|c| *c == '\t').count();
    if tabs > 0 {
        return tabs;
    }
    line.chars().take_while(|c| *c == ' ').count() / 2
}

fn strip_any<'a>(content: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| content.strip_prefix(prefix))
}

fn decode_line(line: &str) -> Item {
    let indent_level = indent_level(line);
    let content = line.trim_start();

    let (kind, text, completed) = if let Some(rest) = strip_any(content, &DONE_PREFIXES) {
        (ItemKind::Checkbox, rest, true)
    } else if let Some(rest) = content.strip_prefix(OPEN_PREFIX) {
        (ItemKind::Checkbox, rest, false)
    } else if let Some(rest) = strip_any(content, &BULLET_PREFIXES) {
        (ItemKind::Bullet, rest, false)
    } else if content.starts_with('#') {
        // Any heading depth collapses to a single heading kind
        let rest = content.trim_start_matches('#').trim_start();
        (ItemKind::Heading, rest, false)
    } else {
        (ItemKind::Plain, content, false)
    };

    Item::new(kind, text)
        .with_indent(indent_level)
        .with_completed(completed)
}
