//! One JSON file per event, partitioned by day.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;
use vaultline_core::{Bucket, CacheLayout, EnrichedEvent, EventId};

use crate::delivery::clear_delivered;
use crate::error::{StorageError, StorageResult};

/// Writes enriched events to `var/cache/<YYYYMMDD>/<id>.json`.
#[derive(Debug, Clone)]
pub struct BucketStore {
    layout: CacheLayout,
}

impl BucketStore {
    /// Create a store rooted at the given layout.
    #[must_use]
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    /// Cache layout this store writes into.
    #[must_use]
    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Location of an event's file.
    #[must_use]
    pub fn path_for(&self, bucket: &Bucket, id: &EventId) -> PathBuf {
        self.layout.event_path(bucket, id)
    }

    /// Persist an event, replacing any existing file for the same id.
    ///
    /// The canonical JSON is written to a temp file in the bucket directory,
    /// synced, then renamed over the target, so a reader never sees a
    /// partial file. Any delivery marker of the previous copy is dropped
    /// first, so the new content counts as pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket directory cannot be created or the
    /// file cannot be written.
    pub fn write(&self, event: &EnrichedEvent) -> StorageResult<PathBuf> {
        let dir = self.layout.bucket_dir(&event.bucket);
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.path_for(&event.bucket, &event.id);
        let bytes = event.to_canonical_json()?;
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        clear_delivered(&path)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        debug!(event_id = %event.id, bucket = %event.bucket, path = %path.display(), "stored event");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};
    use tempfile::TempDir;
    use vaultline_core::Event;

    use super::*;

    fn enriched(value: Value) -> EnrichedEvent {
        Event::from_vault_value(value)
            .unwrap()
            .enrich(&vaultline_core::Identity::new("Alice", "alice@example.com"))
    }

    #[test]
    fn test_write_creates_bucket_and_file() {
        let tmp = TempDir::new().unwrap();
        let store = BucketStore::new(CacheLayout::from_path(tmp.path()));
        let event = enriched(json!({"eid": 42, "time": "2024-01-15T10:00:00Z", "actorUuid": "U1"}));

        let path = store.write(&event).unwrap();
        assert_eq!(path, tmp.path().join("var/cache/20240115/42.json"));

        let written: Map<String, Value> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["user_name"], "Alice");
        assert_eq!(written["eid"], 42);
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let store = BucketStore::new(CacheLayout::from_path(tmp.path()));
        let event = enriched(json!({"eid": "7", "time": "2024-01-15T10:00:00Z", "note": "é"}));

        let path = store.write(&event).unwrap();
        let first = fs::read(&path).unwrap();
        store.write(&event).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1, "no temp files or duplicates left behind");
    }

    #[test]
    fn test_rewrite_replaces_stale_content() {
        let tmp = TempDir::new().unwrap();
        let store = BucketStore::new(CacheLayout::from_path(tmp.path()));
        let event = enriched(json!({"eid": "7", "time": "2024-01-15T10:00:00Z"}));
        let path = store.path_for(&event.bucket, &event.id);

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"stale").unwrap();

        store.write(&event).unwrap();
        assert_ne!(fs::read(&path).unwrap(), b"stale");
    }

    #[test]
    fn test_rewrite_drops_delivery_marker() {
        let tmp = TempDir::new().unwrap();
        let store = BucketStore::new(CacheLayout::from_path(tmp.path()));
        let event = enriched(json!({"eid": "7", "time": "2024-01-15T10:00:00Z"}));

        let path = store.write(&event).unwrap();
        crate::mark_delivered(&path).unwrap();
        assert!(crate::is_delivered(&path));

        store.write(&event).unwrap();
        assert!(!crate::is_delivered(&path));
    }
}
