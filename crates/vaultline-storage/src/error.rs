//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;
use vaultline_core::CoreError;

/// Errors that can occur while persisting events.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written or replaced.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An event could not be serialized.
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] CoreError),

    /// A manifest line could not be parsed.
    #[error("invalid manifest line {line}: {reason}")]
    ManifestParse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Another run holds the cache lock.
    #[error("a run is already in progress (lock held on {path})")]
    LockHeld {
        /// Lock file path.
        path: PathBuf,
    },

    /// The lock file could not be opened or locked.
    #[error("failed to lock {path}: {source}")]
    Lock {
        /// Lock file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
