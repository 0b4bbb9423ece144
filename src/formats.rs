//! Text formats for list documents.
//!
//! Each format is a pair of total functions over [`Item`] sequences. The
//! closed [`FileFormat`] enum is the only way to pick one; adding a format
//! means adding a variant and every `match` below stops compiling until it is
//! handled.

use core::{fmt, str::FromStr};
use std::fmt::Debug;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{FormatError, FormatResult},
    models::{Item, Items},
};

pub mod markdown;
pub mod plain_text;
pub mod taskpaper;

pub use markdown::MarkdownCodec;
pub use plain_text::PlainTextCodec;
pub use taskpaper::TaskPaperCodec;

pub trait ListCodec: Send + Sync + Debug {
    /// Render items as text, one line per item, joined with `\n`
    fn encode(&self, items: &[Item]) -> String;

    /// Parse text into items; never fails, unknown lines become plain items
    fn decode(&self, text: &str) -> Items;
}

/// Supported file formats for list documents
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum,
)]
pub enum FileFormat {
    #[default]
    PlainText,
    TaskPaper,
    Markdown,
}

impl FileFormat {
    pub const ALL: [Self; 3] = [Self::PlainText, Self::TaskPaper, Self::Markdown];

    /// File extension without the dot
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::TaskPaper => "taskpaper",
            Self::Markdown => "md",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::PlainText => "Plain Text",
            Self::TaskPaper => "TaskPaper",
            Self::Markdown => "Markdown",
        }
    }

    /// Resolve an extension (case-insensitive, leading dot allowed)
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnsupportedExtension`] when no format uses it
    pub fn from_extension(ext: &str) -> FormatResult<Self> {
        let ext = ext.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
            .ok_or_else(|| FormatError::unsupported_extension(ext))
    }

    /// Resolve the format of a file name, falling back to plain text
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        split_file_name(name)
            .1
            .and_then(|ext| Self::from_extension(ext).ok())
            .unwrap_or(Self::PlainText)
    }

    /// Whether a file name carries one of the supported extensions
    #[must_use]
    pub fn is_supported_file_name(name: &str) -> bool {
        split_file_name(name)
            .1
            .is_some_and(|ext| Self::from_extension(ext).is_ok())
    }

    /// The codec for this format
    #[must_use]
    pub fn codec(&self) -> &'static dyn ListCodec {
        match self {
            Self::PlainText => &PlainTextCodec,
            Self::TaskPaper => &TaskPaperCodec,
            Self::Markdown => &MarkdownCodec,
        }
    }

    #[must_use]
    pub fn encode(&self, items: &[Item]) -> String {
        let text = match self {
            Self::PlainText => PlainTextCodec.encode(items),
            Self::TaskPaper => TaskPaperCodec.encode(items),
            Self::Markdown => MarkdownCodec.encode(items),
        };
        debug!("encoded {} items as {}", items.len(), self);
        text
    }

    #[must_use]
    pub fn decode(&self, text: &str) -> Items {
        let items = match self {
            Self::PlainText => PlainTextCodec.decode(text),
            Self::TaskPaper => TaskPaperCodec.decode(text),
            Self::Markdown => MarkdownCodec.decode(text),
        };
        debug!("decoded {} items as {}", items.len(), self);
        items
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FileFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Split `name` into its stem and extension (without the dot).
///
/// Dot-files such as `.hidden` have no extension.
#[must_use]
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Non-empty lines of `text`, split on line feeds only
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.is_empty())
}

/// Strip leading tab characters, returning the count and the rest
pub(crate) fn strip_tabs(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches('\t');
    (line.len() - rest.len(), rest)
}

pub(crate) fn join_lines<F>(items: &[Item], render: F) -> String
where
    F: Fn(&Item) -> String,
{
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}
