//! Directory scaffolding under the cache root.
//!
//! # Layout
//!
//! ```text
//! <cache_root>/
//! ├── etc/                          (reserved for operator config)
//! ├── log/
//! │   ├── manifest.<YYYYMMDD>.log   (append-only manifest per run date)
//! │   └── vaultline.<date>          (optional rolling log file)
//! └── var/
//!     ├── run.lock                  (held while a run is active)
//!     └── cache/
//!         └── <YYYYMMDD>/
//!             └── <eventId>.json    (enriched event)
//! ```

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::bucket::Bucket;
use crate::event::EventId;

/// The directory tree rooted at the configured cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Create a layout rooted at `root`. Nothing is touched on disk.
    #[must_use]
    pub fn from_path(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create every fixed directory if absent.
    ///
    /// The root is restricted to the owner on Unix, since it holds the
    /// organisation's audit trail.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or its permissions
    /// cannot be set.
    pub fn ensure(&self) -> io::Result<()> {
        for dir in [
            self.root.clone(),
            self.etc_dir(),
            self.log_dir(),
            self.var_dir(),
            self.cache_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.root, std::fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }

    /// Root directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config directory (`<root>/etc/`).
    #[must_use]
    pub fn etc_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    /// Log directory (`<root>/log/`).
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.root.join("log")
    }

    /// State directory (`<root>/var/`).
    #[must_use]
    pub fn var_dir(&self) -> PathBuf {
        self.root.join("var")
    }

    /// Event cache directory (`<root>/var/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.var_dir().join("cache")
    }

    /// Directory holding the events of one day.
    #[must_use]
    pub fn bucket_dir(&self, bucket: &Bucket) -> PathBuf {
        self.cache_dir().join(bucket.to_string())
    }

    /// Path of a persisted event.
    #[must_use]
    pub fn event_path(&self, bucket: &Bucket, id: &EventId) -> PathBuf {
        self.bucket_dir(bucket).join(id.file_name())
    }

    /// Manifest file for a run date.
    #[must_use]
    pub fn manifest_path(&self, run_date: NaiveDate) -> PathBuf {
        self.log_dir()
            .join(format!("manifest.{}.log", run_date.format("%Y%m%d")))
    }

    /// Advisory lock file guarding against simultaneous runs.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.var_dir().join("run.lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = CacheLayout::from_path("/srv/vl");
        let bucket: Bucket = "20240102".parse().unwrap();
        let id = EventId::new("991").unwrap();

        assert_eq!(
            layout.event_path(&bucket, &id),
            PathBuf::from("/srv/vl/var/cache/20240102/991.json")
        );
        assert_eq!(
            layout.manifest_path(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            PathBuf::from("/srv/vl/log/manifest.20240105.log")
        );
        assert_eq!(layout.lock_path(), PathBuf::from("/srv/vl/var/run.lock"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CacheLayout::from_path(dir.path().join("cache"));
        layout.ensure().unwrap();
        layout.ensure().unwrap();

        assert!(layout.etc_dir().is_dir());
        assert!(layout.log_dir().is_dir());
        assert!(layout.cache_dir().is_dir());
    }
}
