//! `UniFFI` bindings.
//!
//! Hosts (Swift, Kotlin, Python, ...) see ids as strings and timestamps as
//! `SystemTime`; everything else maps one to one onto the Rust types.
#![allow(clippy::cast_possible_truncation, clippy::needless_pass_by_value)]

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::StoreConfig,
    document::{Document, MAX_INDENT},
    error::{ListResult, StoreError},
    formats::FileFormat,
    logging,
    managers::SearchHit,
    models::{self, Item, ItemKind, Priority},
    reminders::{NoReminders, ReminderScheduler},
    repo::{DirectoryStorage, MemoryStorage, StorageProvider},
    store::DocumentStore,
    templates::{BUILT_IN, ListTemplate},
};

/// An item as seen by the host
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiItem {
    /// May be empty for items the host builds itself
    pub id: String,
    pub text: String,
    pub kind: ItemKind,
    pub completed: bool,
    pub indent_level: u32,
    pub due_date: Option<SystemTime>,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl From<&Item> for FfiItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            text: item.text.clone(),
            kind: item.kind,
            completed: item.completed,
            indent_level: u32::try_from(item.indent_level).unwrap_or(u32::MAX),
            due_date: item.due_date.map(SystemTime::from),
            priority: item.priority,
            tags: item.tags(),
        }
    }
}

/// Host indentation, capped at [`MAX_INDENT`]
fn host_indent(level: u32) -> usize {
    usize::try_from(level).map_or(MAX_INDENT, |level| level.min(MAX_INDENT))
}

impl FfiItem {
    /// The model item; an unparsable id gets a fresh one
    fn to_item(&self) -> Item {
        let mut item = Item::new(self.kind, self.text.clone())
            .with_indent(host_indent(self.indent_level))
            .with_completed(self.completed)
            .with_priority(self.priority);
        if let Ok(id) = Uuid::parse_str(&self.id) {
            item.id = id;
        }
        item.due_date = self.due_date.map(DateTime::<Utc>::from);
        item
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiDocument {
    pub id: String,
    pub title: String,
    pub format: FileFormat,
    pub file_name: String,
    pub items: Vec<FfiItem>,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
    /// The last write of this document failed
    pub unsaved: bool,
}

impl FfiDocument {
    fn new(doc: &Document, unsaved: bool) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            format: doc.format(),
            file_name: doc.file_name().to_owned(),
            items: doc.items().iter().map(FfiItem::from).collect(),
            created_at: doc.created_at().into(),
            modified_at: doc.modified_at().into(),
            unsaved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiSearchHit {
    pub document_id: String,
    pub title: String,
    pub matching_items: Vec<FfiItem>,
}

impl From<SearchHit> for FfiSearchHit {
    fn from(hit: SearchHit) -> Self {
        Self {
            document_id: hit.document_id.to_string(),
            title: hit.title,
            matching_items: hit.matching_items.iter().map(FfiItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiTemplate {
    pub name: String,
    pub icon: String,
    pub items: Vec<String>,
}

impl From<&ListTemplate> for FfiTemplate {
    fn from(template: &ListTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            icon: template.icon.to_string(),
            items: template.items.iter().map(ToString::to_string).collect(),
        }
    }
}

fn parse_id(id: &str) -> ListResult<Uuid> {
    Ok(Uuid::parse_str(id).map_err(|_| StoreError::invalid_id(id))?)
}

fn ids(ids: Vec<Uuid>) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

fn hits(hits: Vec<SearchHit>) -> Vec<FfiSearchHit> {
    hits.into_iter().map(FfiSearchHit::from).collect()
}

/// A library of list documents shared with the host
#[derive(uniffi::Object)]
pub struct ListLibrary {
    store: Mutex<DocumentStore>,
}

impl ListLibrary {
    fn store(&self) -> MutexGuard<'_, DocumentStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn document_view(store: &DocumentStore, id: Uuid) -> ListResult<FfiDocument> {
        let unsaved = store.unsaved().contains(&id);
        Ok(FfiDocument::new(store.document(id)?, unsaved))
    }
}

#[uniffi::export]
impl ListLibrary {
    /// Library over host-provided storage and reminders
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid
    #[uniffi::constructor]
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        reminders: Arc<dyn ReminderScheduler>,
        config: StoreConfig,
    ) -> ListResult<Self> {
        Ok(Self {
            store: Mutex::new(DocumentStore::new(storage, reminders, config)?),
        })
    }

    /// Library over one directory of list files
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid
    #[uniffi::constructor]
    pub fn open_directory(path: String, config: StoreConfig) -> ListResult<Self> {
        Self::new(
            Arc::new(DirectoryStorage::new(path)),
            Arc::new(NoReminders),
            config,
        )
    }

    /// Library that keeps its files in memory
    #[uniffi::constructor]
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Mutex::new(DocumentStore::with_storage(Arc::new(MemoryStorage::new()))),
        }
    }

    /// Reload every document from storage, returning how many were found
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be listed
    pub fn load(&self) -> ListResult<u32> {
        Ok(self.store().load()? as u32)
    }

    pub fn documents(&self) -> Vec<FfiDocument> {
        let store = self.store();
        let unsaved = store.unsaved();
        store
            .documents()
            .iter()
            .map(|doc| FfiDocument::new(doc, unsaved.contains(&doc.id())))
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn document(&self, id: String) -> ListResult<FfiDocument> {
        Self::document_view(&self.store(), parse_id(&id)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid id
    pub fn read_document(&self, id: String) -> ListResult<String> {
        Ok(self.store().document(parse_id(&id)?)?.encode())
    }

    pub fn selected_document(&self) -> Option<FfiDocument> {
        let store = self.store();
        let id = store.selected_id()?;
        Self::document_view(&store, id).ok()
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn select(&self, id: Option<String>) -> ListResult<()> {
        let id = id.as_deref().map(parse_id).transpose()?;
        Ok(self.store().select(id)?)
    }

    /// # Errors
    ///
    /// Never fails in practice; the result type covers the document lookup
    pub fn create_document(
        &self,
        title: String,
        format: Option<FileFormat>,
    ) -> ListResult<FfiDocument> {
        let mut store = self.store();
        let id = store.create_document(&title, format);
        Self::document_view(&store, id)
    }

    /// # Errors
    ///
    /// Returns an error if no built-in template has that name
    pub fn create_from_template(
        &self,
        template: String,
        title: Option<String>,
        format: Option<FileFormat>,
    ) -> ListResult<FfiDocument> {
        let mut store = self.store();
        let id = store.create_from_template(&template, title.as_deref(), format)?;
        Self::document_view(&store, id)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn delete_document(&self, id: String) -> ListResult<()> {
        Ok(self.store().delete_document(parse_id(&id)?)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id, a file name used by
    /// another document, or a failed rename
    pub fn rename_document(&self, id: String, title: String) -> ListResult<bool> {
        Ok(self.store().rename_document(parse_id(&id)?, &title)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id or a file name used by
    /// another document
    pub fn convert_document(&self, id: String, format: FileFormat) -> ListResult<bool> {
        Ok(self.store().convert_document(parse_id(&id)?, format)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown document id
    pub fn add_item(
        &self,
        document_id: String,
        after: Option<u32>,
        kind: Option<ItemKind>,
        indent_level: u32,
    ) -> ListResult<String> {
        let id = self.store().add_item(
            parse_id(&document_id)?,
            after.map(|index| index as usize),
            kind,
            host_indent(indent_level),
        )?;
        Ok(id.to_string())
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown document id
    pub fn paste_items(
        &self,
        document_id: String,
        text: String,
        after: Option<u32>,
        kind: Option<ItemKind>,
    ) -> ListResult<Vec<String>> {
        let added = self.store().paste_items(
            parse_id(&document_id)?,
            &text,
            after.map(|index| index as usize),
            kind,
        )?;
        Ok(ids(added))
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn remove_item(&self, document_id: String, item_id: String) -> ListResult<()> {
        Ok(self
            .store()
            .remove_item(parse_id(&document_id)?, parse_id(&item_id)?)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn set_item_text(
        &self,
        document_id: String,
        item_id: String,
        text: String,
    ) -> ListResult<()> {
        Ok(self
            .store()
            .set_item_text(parse_id(&document_id)?, parse_id(&item_id)?, &text)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn set_item_kind(
        &self,
        document_id: String,
        item_id: String,
        kind: ItemKind,
    ) -> ListResult<()> {
        Ok(self
            .store()
            .set_item_kind(parse_id(&document_id)?, parse_id(&item_id)?, kind)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn toggle_complete(&self, document_id: String, item_id: String) -> ListResult<bool> {
        Ok(self
            .store()
            .toggle_complete(parse_id(&document_id)?, parse_id(&item_id)?)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn set_indent(
        &self,
        document_id: String,
        item_id: String,
        indent_level: u32,
    ) -> ListResult<()> {
        Ok(self.store().set_indent(
            parse_id(&document_id)?,
            parse_id(&item_id)?,
            host_indent(indent_level),
        )?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn indent_item(&self, document_id: String, item_id: String) -> ListResult<u32> {
        let level = self
            .store()
            .indent_item(parse_id(&document_id)?, parse_id(&item_id)?)?;
        Ok(u32::try_from(level).unwrap_or(u32::MAX))
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn outdent_item(&self, document_id: String, item_id: String) -> ListResult<u32> {
        let level = self
            .store()
            .outdent_item(parse_id(&document_id)?, parse_id(&item_id)?)?;
        Ok(u32::try_from(level).unwrap_or(u32::MAX))
    }

    /// # Errors
    ///
    /// Returns an error for an unknown document or an out-of-range offset
    pub fn move_items(
        &self,
        document_id: String,
        offsets: Vec<u32>,
        destination: u32,
    ) -> ListResult<()> {
        let offsets: Vec<usize> = offsets.into_iter().map(|offset| offset as usize).collect();
        Ok(self
            .store()
            .move_items(parse_id(&document_id)?, &offsets, destination as usize)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn set_priority(
        &self,
        document_id: String,
        item_id: String,
        priority: Priority,
    ) -> ListResult<()> {
        Ok(self
            .store()
            .set_priority(parse_id(&document_id)?, parse_id(&item_id)?, priority)?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn set_due_date(
        &self,
        document_id: String,
        item_id: String,
        due: Option<SystemTime>,
    ) -> ListResult<()> {
        Ok(self.store().set_due_date(
            parse_id(&document_id)?,
            parse_id(&item_id)?,
            due.map(DateTime::<Utc>::from),
        )?)
    }

    /// # Errors
    ///
    /// Returns an error for an invalid or unknown id
    pub fn remove_completed(&self, document_id: String) -> ListResult<Vec<String>> {
        Ok(ids(self.store().remove_completed(parse_id(&document_id)?)?))
    }

    pub fn search(&self, query: String) -> Vec<FfiSearchHit> {
        hits(self.store().search(&query))
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.store().all_tags()
    }

    pub fn filter_by_tag(&self, tag: String) -> Vec<FfiSearchHit> {
        hits(self.store().filter_by_tag(&tag))
    }

    pub fn find_by_title(&self, title: String) -> Option<FfiDocument> {
        let store = self.store();
        let id = store.find_by_title(&title)?.id();
        Self::document_view(&store, id).ok()
    }

    /// # Errors
    ///
    /// Returns an error if no document has that title
    pub fn add_item_to_list(&self, title: String, text: String) -> ListResult<String> {
        Ok(self.store().add_item_to_list(&title, &text)?.to_string())
    }

    pub fn unsaved(&self) -> Vec<String> {
        ids(self.store().unsaved())
    }

    /// # Errors
    ///
    /// Returns the storage error if a document still cannot be written
    pub fn flush(&self) -> ListResult<()> {
        Ok(self.store().flush()?)
    }

    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn snapshot(&self) -> ListResult<Vec<u8>> {
        Ok(self.store().snapshot()?)
    }

    /// # Errors
    ///
    /// Returns an error for bytes that are not a snapshot
    pub fn restore_snapshot(&self, bytes: Vec<u8>) -> ListResult<()> {
        Ok(self.store().restore_snapshot(&bytes)?)
    }
}

/// Encode host items in `format`
#[uniffi::export]
pub fn encode_items(items: Vec<FfiItem>, format: FileFormat) -> String {
    let items: Vec<Item> = items.iter().map(FfiItem::to_item).collect();
    format.encode(&items)
}

/// Decode `text` written in `format`
#[uniffi::export]
pub fn decode_text(text: String, format: FileFormat) -> Vec<FfiItem> {
    format.decode(&text).iter().map(FfiItem::from).collect()
}

#[uniffi::export]
pub fn extract_tags(text: String) -> Vec<String> {
    models::extract_tags(&text)
}

/// One item of `kind` per non-blank line, no prefixes interpreted
#[uniffi::export]
pub fn import_lines(text: String, kind: ItemKind) -> Vec<FfiItem> {
    models::import_lines(&text, kind)
        .iter()
        .map(FfiItem::from)
        .collect()
}

/// Format of a file name, plain text when the extension is unknown
#[uniffi::export]
pub fn format_for_file_name(name: String) -> FileFormat {
    FileFormat::from_file_name(&name)
}

/// # Errors
///
/// Returns an error if no format uses the extension
#[uniffi::export]
pub fn format_for_extension(extension: String) -> ListResult<FileFormat> {
    Ok(FileFormat::from_extension(&extension)?)
}

#[uniffi::export]
pub fn built_in_templates() -> Vec<FfiTemplate> {
    BUILT_IN.iter().map(FfiTemplate::from).collect()
}

/// # Errors
///
/// Returns an error if logging cannot be started with these settings
#[uniffi::export]
pub fn init_logging(level: String, log_dir: String) -> ListResult<()> {
    logging::init_logging(&level, &log_dir)
}

#[uniffi::export]
pub fn default_log_level() -> String {
    logging::default_log_level().to_string()
}
