//! Delivery markers for stored event files.
//!
//! A delivered file that is kept on disk gets an empty `<id>.delivered`
//! file next to it. Event files without a marker are still pending.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Extension of the marker written next to a delivered event file.
pub const DELIVERED_EXTENSION: &str = "delivered";

/// Marker path for the event file at `event_path`.
#[must_use]
pub fn delivery_marker(event_path: &Path) -> PathBuf {
    event_path.with_extension(DELIVERED_EXTENSION)
}

/// Whether the event file at `event_path` was delivered in its current form.
#[must_use]
pub fn is_delivered(event_path: &Path) -> bool {
    delivery_marker(event_path).is_file()
}

/// Record that the event file at `event_path` was delivered.
///
/// # Errors
///
/// Returns an error if the marker cannot be created.
pub fn mark_delivered(event_path: &Path) -> StorageResult<()> {
    let marker = delivery_marker(event_path);
    File::create(&marker).map_err(|source| StorageError::Write {
        path: marker.clone(),
        source,
    })?;
    debug!(path = %event_path.display(), "marked delivered");
    Ok(())
}

/// Drop the marker of the event file at `event_path`, if any.
///
/// # Errors
///
/// Returns an error if an existing marker cannot be removed.
pub fn clear_delivered(event_path: &Path) -> StorageResult<()> {
    let marker = delivery_marker(event_path);
    match fs::remove_file(&marker) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StorageError::Write {
            path: marker,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_marker_lifecycle() {
        let tmp = TempDir::new().unwrap();
        let event = tmp.path().join("42.json");
        fs::write(&event, b"{}").unwrap();

        assert!(!is_delivered(&event));
        mark_delivered(&event).unwrap();
        assert!(is_delivered(&event));
        assert_eq!(delivery_marker(&event), tmp.path().join("42.delivered"));

        clear_delivered(&event).unwrap();
        assert!(!is_delivered(&event));
        // Clearing twice is fine.
        clear_delivered(&event).unwrap();
    }
}
