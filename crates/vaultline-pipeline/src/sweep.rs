//! Re-forwarding of event files left behind by failed publishes.

use std::path::PathBuf;

use tracing::{info, warn};
use vaultline_core::CacheLayout;
use vaultline_publish::{Forwarder, PublishReceipt};
use vaultline_storage::{RunLock, is_delivered, mark_delivered};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Files the endpoint accepted.
    pub delivered: usize,
    /// Files the endpoint answered with a non-200 status.
    pub rejected: usize,
    /// Files that could not be sent.
    pub failed: usize,
    /// Files removed after delivery.
    pub removed: usize,
}

impl SweepSummary {
    /// Files attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered
            .saturating_add(self.rejected)
            .saturating_add(self.failed)
    }
}

/// Event files under `var/cache/<bucket>/` not yet delivered, oldest
/// bucket first.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be read.
pub fn pending_files(layout: &CacheLayout) -> PipelineResult<Vec<PathBuf>> {
    let root = layout.cache_dir();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| PipelineError::Scan {
            path: root.clone(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "json")
            && !is_delivered(path)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Forward every event file not yet delivered, without contacting the
/// vault.
///
/// Holds the run lock so a sweep never overlaps a run. No manifest lines
/// are written.
///
/// # Errors
///
/// Returns an error if the lock is held or the cache cannot be scanned.
/// Individual publish failures are counted, not returned.
pub fn publish_pending<F: Forwarder>(
    layout: &CacheLayout,
    forwarder: &F,
) -> PipelineResult<SweepSummary> {
    let _lock = RunLock::acquire(layout)?;
    let mut summary = SweepSummary::default();

    for path in pending_files(layout)? {
        match forwarder.forward(&path) {
            Ok(PublishReceipt::Delivered { removed }) => {
                summary.delivered = summary.delivered.saturating_add(1);
                if removed {
                    summary.removed = summary.removed.saturating_add(1);
                } else if let Err(e) = mark_delivered(&path) {
                    warn!(path = %path.display(), error = %e, "delivered event not marked");
                }
            },
            Ok(PublishReceipt::Rejected { status }) => {
                warn!(path = %path.display(), status, "endpoint rejected pending event");
                summary.rejected = summary.rejected.saturating_add(1);
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to publish pending event");
                summary.failed = summary.failed.saturating_add(1);
            },
        }
    }

    info!(
        delivered = summary.delivered,
        rejected = summary.rejected,
        failed = summary.failed,
        removed = summary.removed,
        "pending sweep complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use vaultline_test::{ForwardScript, RecordingForwarder, TestCache};

    use super::*;

    fn seed(cache: &TestCache, bucket: &str, name: &str) -> PathBuf {
        let dir = cache.layout().cache_dir().join(bucket);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"{}").unwrap();
        path
    }

    #[test]
    fn test_pending_files_sorted_and_filtered() {
        let cache = TestCache::new();
        let b = seed(&cache, "20240116", "9.json");
        let a = seed(&cache, "20240115", "12.json");
        seed(&cache, "20240115", ".tmpAbC123");
        fs::write(cache.layout().cache_dir().join("stray.json"), b"{}").unwrap();

        assert_eq!(pending_files(cache.layout()).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_pending_files_skips_delivered() {
        let cache = TestCache::new();
        let delivered = seed(&cache, "20240115", "1.json");
        let pending = seed(&cache, "20240115", "2.json");
        mark_delivered(&delivered).unwrap();

        assert_eq!(pending_files(cache.layout()).unwrap(), vec![pending]);
    }

    #[test]
    fn test_publish_pending_marks_kept_deliveries() {
        let cache = TestCache::new();
        let path = seed(&cache, "20240115", "1.json");

        let summary = publish_pending(cache.layout(), &RecordingForwarder::new()).unwrap();
        assert_eq!(summary.delivered, 1);
        assert!(path.exists());
        assert!(is_delivered(&path));

        let again = publish_pending(cache.layout(), &RecordingForwarder::new()).unwrap();
        assert_eq!(again.attempted(), 0);
    }

    #[test]
    fn test_pending_files_without_cache_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let layout = CacheLayout::from_path(tmp.path().join("never-created"));
        assert!(pending_files(&layout).unwrap().is_empty());
    }

    #[test]
    fn test_publish_pending_counts_outcomes() {
        let cache = TestCache::new();
        let first = seed(&cache, "20240115", "1.json");
        let second = seed(&cache, "20240115", "2.json");
        let third = seed(&cache, "20240116", "3.json");

        let forwarder = RecordingForwarder::new()
            .then(ForwardScript::DeliverAndRemove)
            .then(ForwardScript::Reject(500))
            .then(ForwardScript::Fail);

        let summary = publish_pending(cache.layout(), &forwarder).unwrap();
        assert_eq!(
            summary,
            SweepSummary {
                delivered: 1,
                rejected: 1,
                failed: 1,
                removed: 1,
            }
        );
        assert_eq!(summary.attempted(), 3);
        assert_eq!(forwarder.paths(), vec![first.clone(), second.clone(), third.clone()]);
        assert!(!first.exists());
        assert!(second.exists());
        assert!(third.exists());
    }

    #[test]
    fn test_publish_pending_refuses_while_run_in_progress() {
        let cache = TestCache::new();
        let _held = RunLock::acquire(cache.layout()).unwrap();
        let err = publish_pending(cache.layout(), &RecordingForwarder::new()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Storage(vaultline_storage::StorageError::LockHeld { .. })
        ));
    }
}
