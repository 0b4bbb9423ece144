use std::time::SystemTime;

use crate::error::{StorageError, StorageResult};

pub mod fs;
pub mod memory;

pub use fs::DirectoryStorage;
pub use memory::MemoryStorage;

/// A list file as the storage collaborator sees it
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct StoredFile {
    /// File name including the extension, no directory part
    pub name: String,
    pub content: String,
    pub modified_at: SystemTime,
}

/// Where list files live.
///
/// Implemented in Rust by [`MemoryStorage`] and [`DirectoryStorage`], and by
/// hosts that keep files somewhere else (a sandbox container, iCloud, ...).
#[uniffi::export(with_foreign)]
pub trait StorageProvider: Send + Sync {
    /// Every list file, in no particular order
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn list_files(&self) -> StorageResult<Vec<StoredFile>>;

    /// Create or replace a file
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails
    fn write(&self, name: String, content: String) -> StorageResult<()>;

    /// Delete a file
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such file
    fn delete(&self, name: String) -> StorageResult<()>;

    /// Rename a file, refusing to overwrite an existing one
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `old_name` is missing and
    /// [`StorageError::AlreadyExists`] if `new_name` is taken
    fn rename(&self, old_name: String, new_name: String) -> StorageResult<()>;
}

/// File names are flat: no separators, no parent references, not empty
pub(crate) fn check_name(name: &str) -> StorageResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StorageError::io(format!("invalid file name `{name}`")));
    }
    Ok(())
}
