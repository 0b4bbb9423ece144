//! The list document aggregate.
//!
//! A document is an ordered, flat sequence of items plus the format its
//! backing file is written in. Every mutation stamps `modified_at`; writing
//! the result out is the store's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    formats::{FileFormat, split_file_name},
    models::{Item, ItemKind, Items, Priority},
};

pub const DEFAULT_TITLE: &str = "Untitled";

/// Deepest indentation an edit can set
pub const MAX_INDENT: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    title: String,
    items: Items,
    format: FileFormat,
    file_name: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new(title: impl Into<String>, format: FileFormat) -> Self {
        let now = Utc::now();
        let title = title.into();
        Self {
            id: Uuid::new_v4(),
            file_name: format!("{title}.{}", format.extension()),
            title,
            items: Vec::new(),
            format,
            created_at: now,
            modified_at: now,
        }
    }

    /// Create a document by decoding `text` in `format`
    #[must_use]
    pub fn from_text(
        title: impl Into<String>,
        text: &str,
        format: FileFormat,
        modified_at: DateTime<Utc>,
    ) -> Self {
        let mut doc = Self::new(title, format);
        doc.items = format.decode(text);
        doc.modified_at = modified_at;
        doc
    }

    /// Create a document from a stored file: the title is the file stem and
    /// the format comes from the extension, defaulting to plain text. The
    /// name is kept as is, so later writes go back to the same file.
    #[must_use]
    pub fn from_file(name: &str, content: &str, modified_at: DateTime<Utc>) -> Self {
        let (stem, _) = split_file_name(name);
        let format = FileFormat::from_file_name(name);
        let mut doc = Self::from_text(stem, content, format, modified_at);
        name.clone_into(&mut doc.file_name);
        doc
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn format(&self) -> FileFormat {
        self.format
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of the backing file. Loaded documents keep the name they were
    /// read from; otherwise it is `<title>.<extension>`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn file_name_for(&self, format: FileFormat) -> String {
        format!("{}.{}", self.title, format.extension())
    }

    /// Serialize the items with the document's codec
    #[must_use]
    pub fn encode(&self) -> String {
        self.format.encode(&self.items)
    }

    /// Every tag of every item, in document order
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.items.iter().flat_map(Item::tags).collect()
    }

    #[must_use]
    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    fn item_mut(&mut self, id: Uuid) -> StoreResult<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::ItemNotFound(id))
    }

    /// Rename after trimming. Empty or unchanged titles are ignored; returns
    /// whether the title changed.
    pub fn rename(&mut self, title: &str) -> bool {
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed == self.title {
            return false;
        }
        trimmed.clone_into(&mut self.title);
        self.file_name = self.file_name_for(self.format);
        self.touch();
        true
    }

    /// Switch the codec used for every future encode; returns whether the
    /// format changed.
    pub fn convert_to(&mut self, format: FileFormat) -> bool {
        if self.format == format {
            return false;
        }
        self.format = format;
        self.file_name = self.file_name_for(format);
        self.touch();
        true
    }

    /// Add an empty item right after index `after`, or at the end when
    /// `after` is `None` or past the last item.
    pub fn add_item(&mut self, after: Option<usize>, kind: ItemKind, indent_level: usize) -> Uuid {
        let item = Item::new(kind, "").with_indent(indent_level.min(MAX_INDENT));
        let id = item.id;
        self.insert_items(after, vec![item]);
        id
    }

    /// Insert items after index `after` (same placement rule as
    /// [`Document::add_item`]) and return their ids.
    pub fn insert_items(&mut self, after: Option<usize>, items: Items) -> Vec<Uuid> {
        let ids = items.iter().map(|item| item.id).collect();
        match after {
            Some(index) if index < self.items.len() => {
                self.items.splice(index + 1..index + 1, items);
            }
            _ => self.items.extend(items),
        }
        self.touch();
        ids
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn remove_item(&mut self, id: Uuid) -> StoreResult<Item> {
        let index = self.position(id).ok_or(StoreError::ItemNotFound(id))?;
        let item = self.items.remove(index);
        self.touch();
        Ok(item)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn set_text(&mut self, id: Uuid, text: impl Into<String>) -> StoreResult<()> {
        self.item_mut(id)?.text = text.into();
        self.touch();
        Ok(())
    }

    /// Change an item's kind. Leaving the checkbox kind clears completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn set_kind(&mut self, id: Uuid, kind: ItemKind) -> StoreResult<()> {
        let item = self.item_mut(id)?;
        item.kind = kind;
        if kind != ItemKind::Checkbox {
            item.completed = false;
        }
        self.touch();
        Ok(())
    }

    /// Flip completion of a checkbox and return the new state. Other kinds
    /// are left unchanged and report `false`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn toggle_complete(&mut self, id: Uuid) -> StoreResult<bool> {
        let item = self.item_mut(id)?;
        if !item.is_checkbox() {
            return Ok(false);
        }
        item.completed = !item.completed;
        let completed = item.completed;
        self.touch();
        Ok(completed)
    }

    /// Set indentation, capped at [`MAX_INDENT`]
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn set_indent(&mut self, id: Uuid, indent_level: usize) -> StoreResult<()> {
        self.item_mut(id)?.indent_level = indent_level.min(MAX_INDENT);
        self.touch();
        Ok(())
    }

    /// Increase indentation, stopping at [`MAX_INDENT`]
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn indent(&mut self, id: Uuid) -> StoreResult<usize> {
        let item = self.item_mut(id)?;
        item.indent_level = (item.indent_level + 1).min(MAX_INDENT);
        let level = item.indent_level;
        self.touch();
        Ok(level)
    }

    /// Decrease indentation, stopping at 0
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn outdent(&mut self, id: Uuid) -> StoreResult<usize> {
        let item = self.item_mut(id)?;
        item.indent_level = item.indent_level.saturating_sub(1);
        let level = item.indent_level;
        self.touch();
        Ok(level)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn set_due_date(&mut self, id: Uuid, due: Option<DateTime<Utc>>) -> StoreResult<()> {
        self.item_mut(id)?.due_date = due;
        self.touch();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ItemNotFound`] for an unknown id
    pub fn set_priority(&mut self, id: Uuid, priority: Priority) -> StoreResult<()> {
        self.item_mut(id)?.priority = priority;
        self.touch();
        Ok(())
    }

    /// Move the items at `offsets` so they land before the item currently at
    /// `destination` (or at the end when `destination == len`), keeping
    /// their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] if an offset is past the last
    /// item or `destination` is past the end
    pub fn move_items(&mut self, offsets: &[usize], destination: usize) -> StoreResult<()> {
        let len = self.items.len();
        let mut offsets = offsets.to_vec();
        offsets.sort_unstable();
        offsets.dedup();

        if let Some(&index) = offsets.iter().find(|&&index| index >= len) {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        if destination > len {
            return Err(StoreError::IndexOutOfRange {
                index: destination,
                len,
            });
        }
        if offsets.is_empty() {
            return Ok(());
        }

        let before_destination = offsets.iter().filter(|&&index| index < destination).count();
        let mut moved: Items = offsets
            .iter()
            .rev()
            .map(|&index| self.items.remove(index))
            .collect();
        moved.reverse();

        let at = destination - before_destination;
        self.items.splice(at..at, moved);
        self.touch();
        Ok(())
    }

    /// Drop every completed checkbox and return the removed ids
    pub fn remove_completed(&mut self) -> Vec<Uuid> {
        let (done, open): (Items, Items) = self.items.drain(..).partition(Item::is_done);
        self.items = open;
        if !done.is_empty() {
            self.touch();
        }
        done.into_iter().map(|item| item.id).collect()
    }
}
