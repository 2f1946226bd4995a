//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;
use vaultline_storage::StorageError;
use vaultline_vault::VaultError;

/// Errors that abort a run.
///
/// Publish failures never appear here; they are logged and counted in
/// [`crate::RunSummary`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The vault rejected sign-in, a listing failed, or a page was malformed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// An event or manifest line could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cache root could not be created.
    #[error("failed to prepare cache root {path}: {source}")]
    Bootstrap {
        /// Cache root.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The cache directory could not be scanned.
    #[error("failed to scan {path}: {source}")]
    Scan {
        /// Directory being scanned.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
