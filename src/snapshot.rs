//! Binary snapshots of the whole library.
//!
//! The text formats drop ids, due dates and priorities. A snapshot keeps
//! everything, so a host can stash it next to the files and restore the
//! application-only metadata on the next launch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    document::Document,
    error::{SnapshotError, SnapshotResult},
};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub documents: Vec<Document>,
    pub selected: Option<Uuid>,
}

impl Snapshot {
    #[must_use]
    pub fn new(documents: Vec<Document>, selected: Option<Uuid>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            documents,
            selected,
        }
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if CBOR serialization fails
    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        serde_cbor::to_vec(self).map_err(|err| SnapshotError::Encode(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] for malformed bytes or an unknown
    /// snapshot version
    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        let snapshot: Self =
            serde_cbor::from_slice(bytes).map_err(|err| SnapshotError::Decode(err.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Decode(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        formats::FileFormat,
        models::{Item, Priority},
    };

    #[test]
    fn test_metadata_survives() {
        let mut doc = Document::new("Chores", FileFormat::TaskPaper);
        let vacuum = Item::checkbox("vacuum").with_priority(Priority::High);
        let id = doc.insert_items(None, vec![vacuum])[0];
        let due = Utc.with_ymd_and_hms(2024, 2, 3, 10, 0, 0).unwrap();
        doc.set_due_date(id, Some(due)).unwrap();

        let snapshot = Snapshot::new(vec![doc.clone()], Some(doc.id()));
        let restored = Snapshot::from_bytes(&snapshot.to_bytes().unwrap()).unwrap();

        assert_eq!(restored, snapshot);
        let item = &restored.documents[0].items()[0];
        assert_eq!(item.id, id);
        assert_eq!(item.due_date, Some(due));
        assert_eq!(item.priority, Priority::High);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Snapshot::from_bytes(&[0xff, 0x00, 0x13]),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut snapshot = Snapshot::new(Vec::new(), None);
        snapshot.version = 99;
        let bytes = snapshot.to_bytes().unwrap();
        assert!(Snapshot::from_bytes(&bytes).is_err());
    }
}
