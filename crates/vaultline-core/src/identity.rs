//! Resolved actor identities.

use serde::{Deserialize, Serialize};

/// Name recorded when an actor cannot be resolved.
pub const UNRESOLVED_NAME: &str = "unresolved_name";
/// Contact recorded when an actor cannot be resolved.
pub const UNRESOLVED_MAIL: &str = "unresolved_mail";

/// Human-readable identity of an event actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Contact address (email).
    pub contact: String,
}

impl Identity {
    /// Create an identity.
    #[must_use]
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
        }
    }

    /// The sentinel identity used for unknown or absent actors.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::new(UNRESOLVED_NAME, UNRESOLVED_MAIL)
    }

    /// Whether this is the sentinel identity.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.name == UNRESOLVED_NAME && self.contact == UNRESOLVED_MAIL
    }
}
