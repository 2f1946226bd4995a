//! Vault error types.

use thiserror::Error;

/// Errors raised while talking to the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The `op` binary could not be started.
    #[error("vault binary not found: {0}")]
    BinaryNotFound(String),

    /// Sign-in was rejected or produced no session token.
    #[error("vault authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A query command exited unsuccessfully.
    #[error("vault command '{command}' failed: {stderr}")]
    CommandFailed {
        /// Subcommand that failed, without arguments.
        command: String,
        /// Trimmed standard error of the command.
        stderr: String,
    },

    /// A command exceeded its wall-clock limit and was killed.
    #[error("vault command '{command}' timed out after {timeout_secs}s")]
    Timeout {
        /// Subcommand that timed out, without arguments.
        command: String,
        /// Configured limit.
        timeout_secs: u64,
    },

    /// Command output could not be parsed.
    #[error("malformed vault response: {0}")]
    MalformedResponse(String),

    /// A query was issued before a successful sign-in.
    #[error("not signed in to the vault")]
    NotSignedIn,

    /// IO error while driving the subprocess.
    #[error("vault IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Whether the error means no session could be established.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::NotSignedIn)
    }
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
