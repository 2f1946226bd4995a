//! Temporary cache roots.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vaultline_core::CacheLayout;

/// A cache root in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct TestCache {
    _dir: TempDir,
    layout: CacheLayout,
}

impl TestCache {
    /// Create an empty, bootstrapped cache root.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let layout = CacheLayout::from_path(dir.path().join("cache"));
        layout.ensure().expect("bootstrap cache layout");
        Self { _dir: dir, layout }
    }

    /// The cache layout.
    #[must_use]
    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Cache root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Every persisted event file, sorted by path.
    #[must_use]
    pub fn event_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let Ok(buckets) = fs::read_dir(self.layout.cache_dir()) else {
            return files;
        };
        for bucket in buckets.flatten() {
            if let Ok(entries) = fs::read_dir(bucket.path()) {
                files.extend(
                    entries
                        .flatten()
                        .map(|e| e.path())
                        .filter(|p| p.extension().is_some_and(|ext| ext == "json")),
                );
            }
        }
        files.sort();
        files
    }
}

impl Default for TestCache {
    fn default() -> Self {
        Self::new()
    }
}
