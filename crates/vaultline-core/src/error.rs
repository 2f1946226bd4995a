//! Core error types.

use thiserror::Error;

/// Errors raised while interpreting vault records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A vault record lacks a field the pipeline depends on.
    #[error("vault event is missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// An event id cannot be used as a file name.
    #[error("invalid event id {id:?}: {reason}")]
    InvalidEventId {
        /// The offending id.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An event timestamp could not be parsed.
    #[error("invalid event timestamp {value:?}")]
    InvalidTimestamp {
        /// The raw timestamp text.
        value: String,
    },

    /// A vault record was not a JSON object.
    #[error("vault event is not a JSON object")]
    NotAnObject,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
