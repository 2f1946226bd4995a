//! Actor id to identity lookup.

use std::collections::HashMap;

use tracing::debug;
use vaultline_core::Identity;

use crate::session::VaultUser;

/// In-memory actor directory, built once per run from the user listing.
///
/// Lookups never fail: an unknown or absent actor resolves to
/// [`Identity::unresolved`].
#[derive(Debug, Clone)]
pub struct IdentityDirectory {
    entries: HashMap<String, Identity>,
    unresolved: Identity,
}

impl Default for IdentityDirectory {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            unresolved: Identity::unresolved(),
        }
    }
}

impl IdentityDirectory {
    /// Build the directory from a user listing. Users without a uuid are
    /// skipped; for a repeated uuid the first entry wins.
    #[must_use]
    pub fn from_users(users: impl IntoIterator<Item = VaultUser>) -> Self {
        let mut directory = Self::default();
        for user in users {
            if user.uuid.is_empty() {
                debug!(name = %user.name, "skipping user without uuid");
                continue;
            }
            directory
                .entries
                .entry(user.uuid)
                .or_insert_with(|| Identity::new(user.name, user.email));
        }
        directory
    }

    /// Resolve an actor id.
    #[must_use]
    pub fn resolve(&self, actor_id: Option<&str>) -> &Identity {
        actor_id
            .and_then(|id| self.entries.get(id))
            .unwrap_or(&self.unresolved)
    }

    /// Number of known actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no actors are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VaultUser> for IdentityDirectory {
    fn from_iter<I: IntoIterator<Item = VaultUser>>(iter: I) -> Self {
        Self::from_users(iter)
    }
}
