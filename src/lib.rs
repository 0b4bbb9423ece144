#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod config;
pub mod document;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod logging;
pub mod managers;
pub mod models;
pub mod reminders;
pub mod repo;
pub mod snapshot;
pub mod store;
pub mod templates;

// Re-export common types for convenience
pub use config::StoreConfig;
pub use document::Document;
pub use error::{
    FormatError, FormatResult, ListError, ListResult, SnapshotError, SnapshotResult,
    StorageError, StorageResult, StoreError, StoreResult,
};
pub use formats::{FileFormat, ListCodec};
pub use models::{Item, ItemKind, Items, Priority, extract_tags, import_lines};
pub use store::DocumentStore;
