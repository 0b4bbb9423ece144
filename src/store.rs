//! The document store.
//!
//! Owns every loaded [`Document`], the current selection and the storage and
//! reminder collaborators. Each mutation is applied in memory first and then
//! written through; a failed write is logged and the document is remembered
//! as unsaved until [`DocumentStore::flush`] succeeds.
//!
//! File names are unique across the loaded documents, compared without
//! case. When a conversion cannot write its new file, the old file is kept
//! and removed only after a later write succeeds.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::StoreConfig,
    document::Document,
    error::{ListResult, SnapshotResult, StorageError, StorageResult, StoreError, StoreResult},
    formats::FileFormat,
    managers::{SearchHit, TagIndex, filter_by_tag, search},
    models::{ItemKind, Priority, import_lines},
    reminders::{NoReminders, Reminder, ReminderScheduler, cancel_item},
    repo::StorageProvider,
    snapshot::Snapshot,
    templates::ListTemplate,
};

pub struct DocumentStore {
    storage: Arc<dyn StorageProvider>,
    reminders: Arc<dyn ReminderScheduler>,
    config: StoreConfig,
    documents: Vec<Document>,
    selected: Option<Uuid>,
    unsaved: BTreeSet<Uuid>,
    /// Old file left behind by a conversion whose write failed
    superseded: BTreeMap<Uuid, String>,
}

impl DocumentStore {
    /// # Errors
    ///
    /// Returns [`crate::error::ListError::Config`] if `config` is invalid
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        reminders: Arc<dyn ReminderScheduler>,
        config: StoreConfig,
    ) -> ListResult<Self> {
        config.validate()?;
        Ok(Self {
            storage,
            reminders,
            config,
            documents: Vec::new(),
            selected: None,
            unsaved: BTreeSet::new(),
            superseded: BTreeMap::new(),
        })
    }

    /// Store with the default configuration and no reminders
    #[must_use]
    pub fn with_storage(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            reminders: Arc::new(NoReminders),
            config: StoreConfig::default(),
            documents: Vec::new(),
            selected: None,
            unsaved: BTreeSet::new(),
            superseded: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown id
    pub fn document(&self, id: Uuid) -> StoreResult<&Document> {
        self.documents
            .iter()
            .find(|doc| doc.id() == id)
            .ok_or(StoreError::DocumentNotFound(id))
    }

    fn document_mut(&mut self, id: Uuid) -> StoreResult<&mut Document> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id() == id)
            .ok_or(StoreError::DocumentNotFound(id))
    }

    #[must_use]
    pub const fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    #[must_use]
    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.and_then(|id| self.document(id).ok())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown id
    pub fn select(&mut self, id: Option<Uuid>) -> StoreResult<()> {
        if let Some(id) = id {
            self.document(id)?;
        }
        self.selected = id;
        Ok(())
    }

    /// Replace the in-memory library with what storage holds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the files cannot be listed; the
    /// current documents are kept in that case.
    pub fn load(&mut self) -> StoreResult<usize> {
        let files = self.storage.list_files()?;

        let mut documents: Vec<Document> = files
            .iter()
            .map(|file| {
                let modified_at = DateTime::<Utc>::from(file.modified_at);
                Document::from_file(&file.name, &file.content, modified_at)
            })
            .collect();
        if self.config.sort_newest_first {
            documents.sort_by(|a, b| b.modified_at().cmp(&a.modified_at()));
        }

        info!("loaded {} documents", documents.len());
        self.documents = documents;
        self.selected = None;
        self.unsaved.clear();
        self.superseded.clear();
        Ok(self.documents.len())
    }

    fn try_persist(&self, id: Uuid) -> StorageResult<()> {
        let Ok(doc) = self.document(id) else {
            return Ok(());
        };
        self.storage.write(doc.file_name().to_owned(), doc.encode())
    }

    /// Delete the file a document was converted away from, once its new
    /// file has been written. A failed delete keeps the document unsaved.
    fn drop_superseded(&mut self, id: Uuid) -> StorageResult<()> {
        let Some(old_name) = self.superseded.remove(&id) else {
            return Ok(());
        };
        let current = self.document(id).map(|doc| doc.file_name().to_lowercase());
        if current.is_ok_and(|name| name == old_name.to_lowercase()) {
            return Ok(());
        }
        match self.storage.delete(old_name.clone()) {
            Ok(()) | Err(StorageError::NotFound { .. }) => {
                debug!("removed {old_name}");
                Ok(())
            }
            Err(err) => {
                warn!("could not remove {old_name}: {err}");
                self.superseded.insert(id, old_name);
                self.unsaved.insert(id);
                Err(err)
            }
        }
    }

    fn persist(&mut self, id: Uuid) {
        match self.try_persist(id) {
            Ok(()) => {
                self.unsaved.remove(&id);
                let _ = self.drop_superseded(id);
            }
            Err(err) => {
                warn!("could not save document {id}: {err}");
                self.unsaved.insert(id);
            }
        }
    }

    /// Apply `edit` to a document and write it through
    fn edit<T>(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut Document) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let value = edit(self.document_mut(id)?)?;
        self.persist(id);
        Ok(value)
    }

    /// Documents whose last write failed
    #[must_use]
    pub fn unsaved(&self) -> Vec<Uuid> {
        self.unsaved.iter().copied().collect()
    }

    /// Retry every pending write.
    ///
    /// # Errors
    ///
    /// Returns the last storage error if any document is still unsaved
    pub fn flush(&mut self) -> StoreResult<()> {
        let mut last_error = None;
        for id in self.unsaved() {
            let saved = self.try_persist(id).and_then(|()| {
                self.unsaved.remove(&id);
                self.drop_superseded(id)
            });
            if let Err(err) = saved {
                warn!("flush of document {id} failed: {err}");
                last_error = Some(err);
            }
        }
        last_error.map_or(Ok(()), |err| Err(err.into()))
    }

    /// Whether `name` is the file of a document other than `except`, or an
    /// old file still waiting to be removed
    fn name_in_use(&self, name: &str, except: Option<Uuid>) -> bool {
        let name = name.to_lowercase();
        let files = self
            .documents
            .iter()
            .filter(|doc| Some(doc.id()) != except)
            .map(Document::file_name);
        let superseded = self
            .superseded
            .iter()
            .filter(|(id, _)| Some(**id) != except)
            .map(|(_, old_name)| old_name.as_str());
        files.chain(superseded).any(|other| other.to_lowercase() == name)
    }

    /// `title`, or `title 2`, `title 3` and so on if its file name is taken
    fn unused_title(&self, title: String, format: FileFormat) -> String {
        let extension = format.extension();
        let taken = |candidate: &str| self.name_in_use(&format!("{candidate}.{extension}"), None);
        let mut candidate = title.clone();
        let mut n = 2;
        while taken(&candidate) {
            candidate = format!("{title} {n}");
            n += 1;
        }
        candidate
    }

    fn title_or_default(&self, title: &str) -> String {
        let title = title.trim();
        if title.is_empty() {
            self.config.default_title.clone()
        } else {
            title.to_string()
        }
    }

    fn insert_document(&mut self, doc: Document) -> Uuid {
        let id = doc.id();
        info!("created document {:?} ({})", doc.title(), doc.format());
        self.documents.push(doc);
        self.selected = Some(id);
        self.persist(id);
        id
    }

    /// Create an empty document and select it. A blank title falls back to
    /// the configured default, a missing format to the default format. A
    /// title whose file already exists gets a number appended.
    pub fn create_document(&mut self, title: &str, format: Option<FileFormat>) -> Uuid {
        let format = format.unwrap_or(self.config.default_format);
        let title = self.unused_title(self.title_or_default(title), format);
        self.insert_document(Document::new(title, format))
    }

    /// Create a document pre-filled from a built-in template. The title
    /// defaults to the template name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownTemplate`] if no template has that name
    pub fn create_from_template(
        &mut self,
        template: &str,
        title: Option<&str>,
        format: Option<FileFormat>,
    ) -> StoreResult<Uuid> {
        let template = ListTemplate::find(template)
            .ok_or_else(|| StoreError::UnknownTemplate(template.to_string()))?;
        let format = format.unwrap_or(self.config.default_format);
        let title = self.title_or_default(title.unwrap_or(template.name));
        let title = self.unused_title(title, format);

        let mut doc = Document::new(title, format);
        doc.insert_items(None, template.instantiate(self.config.default_kind));
        Ok(self.insert_document(doc))
    }

    /// Remove a document and its file. The first remaining document becomes
    /// selected if the deleted one was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown id
    pub fn delete_document(&mut self, id: Uuid) -> StoreResult<()> {
        let index = self
            .documents
            .iter()
            .position(|doc| doc.id() == id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        let doc = self.documents.remove(index);

        for item in doc.items().iter().filter(|item| item.due_date.is_some()) {
            cancel_item(self.reminders.as_ref(), item.id);
        }
        if self.selected == Some(id) {
            self.selected = self.documents.first().map(Document::id);
        }
        self.unsaved.remove(&id);

        let current = doc.file_name().to_owned();
        let superseded = self
            .superseded
            .remove(&id)
            .filter(|old_name| old_name.to_lowercase() != current.to_lowercase());
        for name in superseded.into_iter().chain([current]) {
            if let Err(err) = self.storage.delete(name.clone()) {
                warn!("could not delete {name}: {err}");
            }
        }
        info!("deleted document {:?}", doc.title());
        Ok(())
    }

    /// Rename a document and its file. The title is trimmed; blank or
    /// unchanged titles are ignored. If the file cannot be renamed the
    /// document keeps its old title.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown id,
    /// [`StoreError::NameTaken`] if another document already uses the new
    /// file name, and [`StoreError::Storage`] if the rename fails
    pub fn rename_document(&mut self, id: Uuid, title: &str) -> StoreResult<bool> {
        let mut renamed = self.document(id)?.clone();
        let old_name = renamed.file_name().to_owned();
        if !renamed.rename(title) {
            return Ok(false);
        }
        let new_name = renamed.file_name().to_owned();
        if self.name_in_use(&new_name, Some(id)) {
            return Err(StoreError::NameTaken(new_name));
        }

        match self.storage.rename(old_name.clone(), new_name.clone()) {
            Ok(()) => info!("renamed {old_name} to {new_name}"),
            // Never written, so the new name is simply written below
            Err(StorageError::NotFound { .. }) if self.unsaved.contains(&id) => {}
            Err(err) => {
                warn!("could not rename {old_name} to {new_name}: {err}");
                return Err(err.into());
            }
        }
        *self.document_mut(id)? = renamed;
        if self.unsaved.contains(&id) {
            self.persist(id);
        }
        Ok(true)
    }

    /// Switch a document to another format: the new file is written and the
    /// old one removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown id and
    /// [`StoreError::NameTaken`] if another document already uses the new
    /// file name
    pub fn convert_document(&mut self, id: Uuid, format: FileFormat) -> StoreResult<bool> {
        let doc = self.document(id)?;
        if doc.format() == format {
            return Ok(false);
        }
        let new_name = doc.file_name_for(format);
        if self.name_in_use(&new_name, Some(id)) {
            return Err(StoreError::NameTaken(new_name));
        }

        let doc = self.document_mut(id)?;
        let old_name = doc.file_name().to_owned();
        doc.convert_to(format);

        // The old file stays until the new one is written
        self.superseded.entry(id).or_insert(old_name);
        self.persist(id);
        info!("converted document {id} to {format}");
        Ok(true)
    }

    /// Add an empty item after index `after` (appended when `None` or out
    /// of range). `kind` defaults to the configured item kind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown document
    pub fn add_item(
        &mut self,
        doc_id: Uuid,
        after: Option<usize>,
        kind: Option<ItemKind>,
        indent_level: usize,
    ) -> StoreResult<Uuid> {
        let kind = kind.unwrap_or(self.config.default_kind);
        self.edit(doc_id, |doc| Ok(doc.add_item(after, kind, indent_level)))
    }

    /// Insert one item per non-blank line of `text`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown document
    pub fn paste_items(
        &mut self,
        doc_id: Uuid,
        text: &str,
        after: Option<usize>,
        kind: Option<ItemKind>,
    ) -> StoreResult<Vec<Uuid>> {
        let items = import_lines(text, kind.unwrap_or(self.config.default_kind));
        debug!("pasting {} items into {doc_id}", items.len());
        self.edit(doc_id, |doc| Ok(doc.insert_items(after, items)))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn remove_item(&mut self, doc_id: Uuid, item_id: Uuid) -> StoreResult<()> {
        let item = self.edit(doc_id, |doc| doc.remove_item(item_id))?;
        if item.due_date.is_some() {
            cancel_item(self.reminders.as_ref(), item_id);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn set_item_text(&mut self, doc_id: Uuid, item_id: Uuid, text: &str) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.set_text(item_id, text))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn set_item_kind(
        &mut self,
        doc_id: Uuid,
        item_id: Uuid,
        kind: ItemKind,
    ) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.set_kind(item_id, kind))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn toggle_complete(&mut self, doc_id: Uuid, item_id: Uuid) -> StoreResult<bool> {
        self.edit(doc_id, |doc| doc.toggle_complete(item_id))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn set_indent(
        &mut self,
        doc_id: Uuid,
        item_id: Uuid,
        indent_level: usize,
    ) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.set_indent(item_id, indent_level))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn indent_item(&mut self, doc_id: Uuid, item_id: Uuid) -> StoreResult<usize> {
        self.edit(doc_id, |doc| doc.indent(item_id))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn outdent_item(&mut self, doc_id: Uuid, item_id: Uuid) -> StoreResult<usize> {
        self.edit(doc_id, |doc| doc.outdent(item_id))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or
    /// [`StoreError::IndexOutOfRange`]
    pub fn move_items(
        &mut self,
        doc_id: Uuid,
        offsets: &[usize],
        destination: usize,
    ) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.move_items(offsets, destination))
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn set_priority(
        &mut self,
        doc_id: Uuid,
        item_id: Uuid,
        priority: Priority,
    ) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.set_priority(item_id, priority))
    }

    /// Set or clear a due date, scheduling or cancelling its reminder
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] or [`StoreError::ItemNotFound`]
    pub fn set_due_date(
        &mut self,
        doc_id: Uuid,
        item_id: Uuid,
        due: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        self.edit(doc_id, |doc| doc.set_due_date(item_id, due))?;

        let doc = self.document(doc_id)?;
        let reminder = doc
            .item(item_id)
            .and_then(|item| Reminder::for_item(item, doc.title()));
        match reminder {
            Some(reminder) => self.reminders.schedule(reminder),
            None => cancel_item(self.reminders.as_ref(), item_id),
        }
        Ok(())
    }

    /// Drop completed checkboxes and cancel their reminders
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown document
    pub fn remove_completed(&mut self, doc_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let removed = self.edit(doc_id, |doc| Ok(doc.remove_completed()))?;
        for id in &removed {
            cancel_item(self.reminders.as_ref(), *id);
        }
        Ok(removed)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search(&self.documents, query)
    }

    /// Distinct tags across every document, sorted
    #[must_use]
    pub fn all_tags(&self) -> Vec<String> {
        TagIndex::build(&self.documents).tags()
    }

    #[must_use]
    pub fn filter_by_tag(&self, tag: &str) -> Vec<SearchHit> {
        filter_by_tag(&self.documents, tag)
    }

    /// First document whose title matches, ignoring case
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&Document> {
        let title = title.to_lowercase();
        self.documents
            .iter()
            .find(|doc| doc.title().to_lowercase() == title)
    }

    /// Append an item with `text` to the list called `title`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ListNotFound`] if no document has that title
    pub fn add_item_to_list(&mut self, title: &str, text: &str) -> StoreResult<Uuid> {
        let doc_id = self
            .find_by_title(title)
            .map(Document::id)
            .ok_or_else(|| StoreError::ListNotFound(title.to_string()))?;
        let kind = self.config.default_kind;
        self.edit(doc_id, |doc| {
            let id = doc.add_item(None, kind, 0);
            doc.set_text(id, text)?;
            Ok(id)
        })
    }

    /// Encode the whole library, metadata included
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SnapshotError::Encode`] on serialization
    /// failure
    pub fn snapshot(&self) -> SnapshotResult<Vec<u8>> {
        Snapshot::new(self.documents.clone(), self.selected).to_bytes()
    }

    /// Replace the in-memory library with a snapshot. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SnapshotError::Decode`] for invalid bytes
    pub fn restore_snapshot(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        let snapshot = Snapshot::from_bytes(bytes)?;
        self.selected = snapshot
            .selected
            .filter(|id| snapshot.documents.iter().any(|doc| doc.id() == *id));
        self.documents = snapshot.documents;
        self.unsaved.clear();
        self.superseded.clear();
        info!("restored {} documents from snapshot", self.documents.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use chrono::TimeZone;

    use super::*;
    use crate::{
        error::StorageError,
        repo::{MemoryStorage, StoredFile},
    };

    /// Memory storage whose writes can be switched off
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    impl StorageProvider for FlakyStorage {
        fn list_files(&self) -> StorageResult<Vec<StoredFile>> {
            self.inner.list_files()
        }

        fn write(&self, name: String, content: String) -> StorageResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::io("disk full"));
            }
            self.inner.write(name, content)
        }

        fn delete(&self, name: String) -> StorageResult<()> {
            self.inner.delete(name)
        }

        fn rename(&self, old_name: String, new_name: String) -> StorageResult<()> {
            self.inner.rename(old_name, new_name)
        }
    }

    #[derive(Default)]
    struct RecordingScheduler {
        scheduled: Mutex<Vec<Reminder>>,
        cancelled: Mutex<Vec<String>>,
    }

    impl ReminderScheduler for RecordingScheduler {
        fn schedule(&self, reminder: Reminder) {
            self.scheduled.lock().unwrap().push(reminder);
        }

        fn cancel(&self, item_id: String) {
            self.cancelled.lock().unwrap().push(item_id);
        }
    }

    fn store_with_reminders() -> (DocumentStore, Arc<RecordingScheduler>) {
        let reminders = Arc::new(RecordingScheduler::default());
        let store = DocumentStore::new(
            Arc::new(MemoryStorage::new()),
            reminders.clone(),
            StoreConfig::default(),
        )
        .unwrap();
        (store, reminders)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StoreConfig {
            default_title: String::new(),
            ..StoreConfig::default()
        };
        assert!(
            DocumentStore::new(Arc::new(MemoryStorage::new()), Arc::new(NoReminders), config)
                .is_err()
        );
    }

    #[test]
    fn test_failed_write_marks_unsaved_until_flush() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = DocumentStore::with_storage(storage.clone());
        let doc = store.create_document("Chores", None);

        storage.failing.store(true, Ordering::SeqCst);
        let item = store.add_item(doc, None, None, 0).unwrap();
        store.set_item_text(doc, item, "dishes").unwrap();

        // The in-memory edit stands even though the write failed
        assert_eq!(store.document(doc).unwrap().items()[0].text, "dishes");
        assert_eq!(store.unsaved(), vec![doc]);
        assert!(matches!(store.flush(), Err(StoreError::Storage(_))));

        storage.failing.store(false, Ordering::SeqCst);
        store.flush().unwrap();
        assert!(store.unsaved().is_empty());
        assert_eq!(storage.inner.content("Chores.txt").as_deref(), Some("- dishes"));
    }

    #[test]
    fn test_failed_conversion_keeps_old_file_until_flush() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = DocumentStore::with_storage(storage.clone());
        let doc = store.create_document("Trip", None);
        store.paste_items(doc, "passport", None, None).unwrap();

        storage.failing.store(true, Ordering::SeqCst);
        assert!(store.convert_document(doc, FileFormat::Markdown).unwrap());
        assert_eq!(storage.inner.names(), vec!["Trip.txt"]);
        assert_eq!(store.unsaved(), vec![doc]);

        storage.failing.store(false, Ordering::SeqCst);
        store.flush().unwrap();
        assert_eq!(storage.inner.names(), vec!["Trip.md"]);
        assert_eq!(store.load().unwrap(), 1);
        assert_eq!(store.documents()[0].items()[0].text, "passport");
    }

    #[test]
    fn test_converting_back_after_failure_keeps_the_file() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = DocumentStore::with_storage(storage.clone());
        let doc = store.create_document("Trip", None);

        storage.failing.store(true, Ordering::SeqCst);
        store.convert_document(doc, FileFormat::Markdown).unwrap();
        store.convert_document(doc, FileFormat::PlainText).unwrap();

        storage.failing.store(false, Ordering::SeqCst);
        store.flush().unwrap();
        assert_eq!(storage.inner.names(), vec!["Trip.txt"]);
    }

    #[test]
    fn test_new_document_cannot_take_a_pending_old_file() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = DocumentStore::with_storage(storage.clone());
        let trip = store.create_document("Trip", None);

        storage.failing.store(true, Ordering::SeqCst);
        store.convert_document(trip, FileFormat::Markdown).unwrap();
        storage.failing.store(false, Ordering::SeqCst);

        let other = store.create_document("Trip", None);
        assert_eq!(store.document(other).unwrap().file_name(), "Trip 2.txt");
        store.flush().unwrap();
        assert_eq!(storage.inner.names(), vec!["Trip 2.txt", "Trip.md"]);
    }

    #[test]
    fn test_rename_of_unwritten_document_writes_new_name() {
        let storage = Arc::new(FlakyStorage::default());
        storage.failing.store(true, Ordering::SeqCst);
        let mut store = DocumentStore::with_storage(storage.clone());
        let doc = store.create_document("Draft", None);
        assert_eq!(store.unsaved(), vec![doc]);

        storage.failing.store(false, Ordering::SeqCst);
        assert!(store.rename_document(doc, "Final").unwrap());
        assert!(store.unsaved().is_empty());
        assert_eq!(storage.inner.names(), vec!["Final.txt"]);
    }

    #[test]
    fn test_failed_rename_keeps_old_title() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = DocumentStore::with_storage(storage.clone());
        let doc = store.create_document("Draft", None);
        store.paste_items(doc, "mine", None, None).unwrap();
        // Present in storage but not loaded
        storage
            .insert("Final.txt", "- theirs", std::time::SystemTime::now())
            .unwrap();

        assert!(matches!(
            store.rename_document(doc, "Final"),
            Err(StoreError::Storage(StorageError::AlreadyExists { .. }))
        ));
        assert_eq!(store.document(doc).unwrap().title(), "Draft");
        assert!(store.unsaved().is_empty());

        store.flush().unwrap();
        store.paste_items(doc, "more", None, None).unwrap();
        assert_eq!(storage.content("Final.txt").as_deref(), Some("- theirs"));
        assert_eq!(storage.content("Draft.txt").as_deref(), Some("- mine\n- more"));
    }

    #[test]
    fn test_due_date_schedules_and_cancels() {
        let (mut store, reminders) = store_with_reminders();
        let doc = store.create_document("Bills", None);
        let item = store.add_item(doc, None, None, 0).unwrap();
        store.set_item_text(doc, item, "pay rent").unwrap();

        let due = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        store.set_due_date(doc, item, Some(due)).unwrap();
        {
            let scheduled = reminders.scheduled.lock().unwrap();
            assert_eq!(scheduled.len(), 1);
            assert_eq!(scheduled[0].title, "Bills");
            assert_eq!(scheduled[0].body, "pay rent");
            assert_eq!(scheduled[0].item_id, item.to_string());
        }

        store.set_due_date(doc, item, None).unwrap();
        assert_eq!(*reminders.cancelled.lock().unwrap(), vec![item.to_string()]);
    }

    #[test]
    fn test_remove_completed_cancels_reminders() {
        let (mut store, reminders) = store_with_reminders();
        let doc = store.create_document("Bills", None);
        let ids = store.paste_items(doc, "rent\nphone\nwater", None, None).unwrap();
        store.toggle_complete(doc, ids[0]).unwrap();
        store.toggle_complete(doc, ids[2]).unwrap();

        let removed = store.remove_completed(doc).unwrap();
        assert_eq!(removed, vec![ids[0], ids[2]]);
        assert_eq!(
            *reminders.cancelled.lock().unwrap(),
            vec![ids[0].to_string(), ids[2].to_string()]
        );
        assert_eq!(store.document(doc).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_cancels_due_items() {
        let (mut store, reminders) = store_with_reminders();
        let doc = store.create_document("Bills", None);
        let ids = store.paste_items(doc, "rent\nphone", None, None).unwrap();
        store.set_due_date(doc, ids[1], Some(Utc::now())).unwrap();

        store.delete_document(doc).unwrap();
        assert_eq!(*reminders.cancelled.lock().unwrap(), vec![ids[1].to_string()]);
    }

    #[test]
    fn test_unknown_ids() {
        let mut store = DocumentStore::with_storage(Arc::new(MemoryStorage::new()));
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.add_item(missing, None, None, 0),
            Err(StoreError::DocumentNotFound(_))
        ));
        let doc = store.create_document("A", None);
        assert!(matches!(
            store.toggle_complete(doc, missing),
            Err(StoreError::ItemNotFound(_))
        ));
        assert!(store.select(Some(missing)).is_err());
        assert!(matches!(
            store.create_from_template("Nope", None, None),
            Err(StoreError::UnknownTemplate(_))
        ));
    }
}
