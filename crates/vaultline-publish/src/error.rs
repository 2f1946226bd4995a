//! Publish error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while forwarding an event file.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The endpoint URL is unusable.
    #[error("invalid publish endpoint '{url}': {reason}")]
    InvalidEndpoint {
        /// Configured URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The persisted event could not be read back.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Event file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The request did not complete.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Endpoint URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },
}

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;
