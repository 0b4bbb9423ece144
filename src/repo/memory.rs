use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};

use crate::{
    error::{StorageError, StorageResult},
    repo::{StorageProvider, StoredFile, check_name},
};

/// In-memory storage, for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, StoredFile>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with an explicit modification time
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid name
    pub fn insert(
        &self,
        name: &str,
        content: &str,
        modified_at: SystemTime,
    ) -> StorageResult<()> {
        check_name(name)?;
        self.files()?.insert(
            name.to_string(),
            StoredFile {
                name: name.to_string(),
                content: content.to_string(),
                modified_at,
            },
        );
        Ok(())
    }

    /// Current content of a file
    #[must_use]
    pub fn content(&self, name: &str) -> Option<String> {
        self.files()
            .ok()
            .and_then(|files| files.get(name).map(|file| file.content.clone()))
    }

    /// File names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.files()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn files(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, StoredFile>>> {
        self.files
            .lock()
            .map_err(|_| StorageError::io("memory storage lock poisoned"))
    }
}

impl StorageProvider for MemoryStorage {
    fn list_files(&self) -> StorageResult<Vec<StoredFile>> {
        Ok(self.files()?.values().cloned().collect())
    }

    fn write(&self, name: String, content: String) -> StorageResult<()> {
        self.insert(&name, &content, SystemTime::now())
    }

    fn delete(&self, name: String) -> StorageResult<()> {
        self.files()?
            .remove(&name)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(name))
    }

    fn rename(&self, old_name: String, new_name: String) -> StorageResult<()> {
        check_name(&new_name)?;
        let mut files = self.files()?;
        if files.contains_key(&new_name) {
            return Err(StorageError::already_exists(new_name));
        }
        let mut file = files
            .remove(&old_name)
            .ok_or_else(|| StorageError::not_found(old_name))?;
        file.name.clone_from(&new_name);
        files.insert(new_name, file);
        Ok(())
    }
}
