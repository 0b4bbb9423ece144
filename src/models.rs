use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Items = Vec<Item>;

/// Line semantics of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Heading,
    Plain,
    Bullet,
    Checkbox,
}

impl ItemKind {
    pub const ALL: [Self; 4] = [Self::Heading, Self::Plain, Self::Bullet, Self::Checkbox];

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Heading => "Heading",
            Self::Plain => "Plain Text",
            Self::Bullet => "Bullet",
            Self::Checkbox => "Checkbox",
        }
    }
}

/// Task priority, ordered `None < Low < Medium < High`
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Short marker shown next to an item
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Low => "!",
            Self::Medium => "!!",
            Self::High => "!!!",
        }
    }
}

/// One line of a list document.
///
/// The outline is flat: depth lives in `indent_level`, not in nested
/// children, which is how every supported text format expresses it.
/// `due_date` and `priority` never reach the text formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub text: String,
    pub kind: ItemKind,
    /// Only meaningful for [`ItemKind::Checkbox`]
    pub completed: bool,
    pub indent_level: usize,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl Item {
    /// Create an open item at indent level 0 with a fresh id
    #[must_use]
    pub fn new(kind: ItemKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            kind,
            completed: false,
            indent_level: 0,
            due_date: None,
            priority: Priority::None,
        }
    }

    #[must_use]
    pub const fn with_indent(mut self, indent_level: usize) -> Self {
        self.indent_level = indent_level;
        self
    }

    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// A checkbox that has been ticked off
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.is_checkbox() && self.completed
    }

    /// Tags found in the item text, in order, duplicates kept
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        extract_tags(&self.text)
    }

    /// Compare the fields the text formats carry: kind, text, indent and,
    /// for checkboxes only, completion.
    #[must_use]
    pub fn same_outline(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.indent_level == other.indent_level
            && (!self.is_checkbox() || self.completed == other.completed)
    }
}

macro_rules! impl_kind_helpers {
    ($($variant:ident),*) => {
        $(
            impl Item {
                paste::paste! {
                    #[must_use]
                    pub fn [<$variant:snake>](text: impl Into<String>) -> Self {
                        Self::new(ItemKind::$variant, text)
                    }

                    #[must_use]
                    pub const fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self.kind, ItemKind::$variant)
                    }
                }
            }
        )*
    };
}

impl_kind_helpers!(Heading, Plain, Bullet, Checkbox);

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Extract `@tag` names from free text.
///
/// Equivalent to the pattern `@(\w+)` over ASCII word characters. `@done` is
/// returned like any other tag when it is present in the text.
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut tags = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'@' {
            pos += 1;
            continue;
        }

        let start = pos + 1;
        let len = bytes[start..]
            .iter()
            .take_while(|b| is_word_byte(**b))
            .count();
        if len > 0 {
            // ASCII-only run, so both ends sit on char boundaries
            tags.push(text[start..start + len].to_string());
        }
        pos = start + len;
    }

    tags
}

/// Turn externally supplied text into items, one per non-blank line.
///
/// Lines are split on `\n`, `\r\n` and `\r`. Every item gets `kind` and
/// indent level 0; no prefixes are interpreted.
#[must_use]
pub fn import_lines(text: &str, kind: ItemKind) -> Items {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .map(|line| Item::new(kind, line))
        .collect()
}
