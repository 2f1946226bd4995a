//! Configuration error types.

use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// File that failed.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match the schema.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// File that failed.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A config file could not be written.
    #[error("failed to write config file {path}: {source}")]
    WriteError {
        /// File that failed.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Rendering configuration to TOML failed.
    #[error("failed to serialize config: {0}")]
    SerializeError(toml::ser::Error),

    /// A required vault credential is not set anywhere.
    #[error("missing required credential `{field}` (set it in the config file, with a flag, or via {env_var})")]
    MissingCredential {
        /// Dotted field path, e.g. `vault.domain`.
        field: &'static str,
        /// Environment variable that can supply it.
        env_var: &'static str,
    },

    /// A value is out of range or malformed.
    #[error("invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
