use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{StorageError, StorageResult},
    formats::FileFormat,
    repo::{StorageProvider, StoredFile, check_name},
};

/// One directory of list files.
///
/// Only non-hidden files with a supported extension are listed. Writes go to
/// a hidden sibling first and are renamed into place.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path(&self, name: &str) -> StorageResult<PathBuf> {
        check_name(name)?;
        Ok(self.root.join(name))
    }

    fn read_entry(path: &Path, name: String) -> io::Result<StoredFile> {
        let content = fs::read_to_string(path)?;
        let modified_at = fs::metadata(path)?.modified()?;
        Ok(StoredFile {
            name,
            content,
            modified_at,
        })
    }
}

fn is_list_file(name: &str) -> bool {
    !name.starts_with('.') && FileFormat::is_supported_file_name(name)
}

impl StorageProvider for DirectoryStorage {
    fn list_files(&self) -> StorageResult<Vec<StoredFile>> {
        self.ensure_root()?;

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_list_file(&name) {
                continue;
            }

            // One unreadable file must not hide the rest
            match Self::read_entry(&entry.path(), name) {
                Ok(file) => files.push(file),
                Err(err) => warn!("skipping {}: {err}", entry.path().display()),
            }
        }

        debug!("listed {} files in {}", files.len(), self.root.display());
        Ok(files)
    }

    fn write(&self, name: String, content: String) -> StorageResult<()> {
        let target = self.path(&name)?;
        self.ensure_root()?;

        let staging = self.root.join(format!(".{name}.{}.tmp", Uuid::new_v4()));
        fs::write(&staging, content)?;
        if let Err(err) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }

    fn delete(&self, name: String) -> StorageResult<()> {
        let path = self.path(&name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::not_found(name))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn rename(&self, old_name: String, new_name: String) -> StorageResult<()> {
        let from = self.path(&old_name)?;
        let to = self.path(&new_name)?;
        if !from.is_file() {
            return Err(StorageError::not_found(old_name));
        }
        if to.exists() {
            return Err(StorageError::already_exists(new_name));
        }
        fs::rename(from, to)?;
        Ok(())
    }
}
