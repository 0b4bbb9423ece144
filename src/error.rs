//! Error types for the outliner library
//!
//! Codecs are total and never fail; everything here belongs to the dispatch
//! boundary, the storage collaborators, the document store and snapshots.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised when resolving a file format from outside input
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum FormatError {
    /// No codec is registered for the extension
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

impl FormatError {
    /// Create an unsupported extension error
    pub fn unsupported_extension(ext: impl Into<String>) -> Self {
        Self::UnsupportedExtension(ext.into())
    }
}

/// Result type for format resolution
pub type FormatResult<T> = Result<T, FormatError>;

/// Storage collaborator errors.
///
/// Variants carry plain strings so host implementations of
/// [`crate::repo::StorageProvider`] can raise them across the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum StorageError {
    /// File not found
    #[error("File not found: {name}")]
    NotFound { name: String },

    /// A file with that name already exists
    #[error("File already exists: {name}")]
    AlreadyExists { name: String },

    /// I/O error
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// The host callback failed in a way it did not declare
    #[error("Storage callback failed: {reason}")]
    Callback { reason: String },
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an already exists error
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Create an I/O error
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Callback { reason: err.reason }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Document store errors
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum StoreError {
    /// No document with that id
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    /// No item with that id in the document
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    /// An id string could not be parsed
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// No document with that title
    #[error("List not found: {0}")]
    ListNotFound(String),

    /// Another document already uses that file name
    #[error("File name already in use: {0}")]
    NameTaken(String),

    /// No built-in template with that name
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Item index out of range
    #[error("Item index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    /// Storage collaborator failure surfaced by an explicit flush
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Create an invalid id error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot (binary metadata) errors
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SnapshotError {
    /// Encoding the snapshot failed
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    /// The bytes are not a valid snapshot
    #[error("Snapshot decoding failed: {0}")]
    Decode(String),
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Unified error type for every outliner operation that can fail
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum ListError {
    /// Format resolution error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Logging could not be started
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl ListError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Result type for outliner operations
pub type ListResult<T> = Result<T, ListError>;
