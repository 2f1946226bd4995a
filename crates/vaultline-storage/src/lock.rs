//! Exclusive guard against simultaneous runs over one cache root.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;
use vaultline_core::CacheLayout;

use crate::error::{StorageError, StorageResult};

/// Holds an advisory exclusive lock on `var/run.lock` until dropped.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LockHeld`] if another process holds the lock,
    /// or [`StorageError::Lock`] if the lock file cannot be opened.
    pub fn acquire(layout: &CacheLayout) -> StorageResult<Self> {
        let dir = layout.var_dir();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = layout.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| StorageError::Lock {
                path: path.clone(),
                source,
            })?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(StorageError::LockHeld { path });
            }
            return Err(StorageError::Lock { path, source: e });
        }

        debug!(path = %path.display(), "acquired run lock");
        Ok(Self { file, path })
    }

    /// Lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // The file stays; only the lock is released.
        let _ = FileExt::unlock(&self.file);
    }
}
