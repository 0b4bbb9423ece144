//! Cross-document queries over loaded lists.

pub mod search;
pub mod tags;

pub use search::{SearchHit, filter_by_tag, search};
pub use tags::{TagHit, TagIndex};
