use serde::{Deserialize, Serialize};

use crate::{
    document::DEFAULT_TITLE,
    error::{ListError, ListResult},
    formats::FileFormat,
    models::ItemKind,
};

/// Defaults applied by the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct StoreConfig {
    /// Title used when a new document is created with a blank title
    pub default_title: String,
    /// Format of newly created documents
    pub default_format: FileFormat,
    /// Kind given to new and pasted items
    pub default_kind: ItemKind,
    /// Order documents by modification time, newest first, when loading
    pub sort_newest_first: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            default_format: FileFormat::PlainText,
            default_kind: ItemKind::Checkbox,
            sort_newest_first: true,
        }
    }
}

impl StoreConfig {
    /// # Errors
    ///
    /// Returns [`ListError::Config`] when the default title is blank
    pub fn validate(&self) -> ListResult<()> {
        if self.default_title.trim().is_empty() {
            return Err(ListError::config("default title must not be blank"));
        }
        Ok(())
    }
}
