//! The vault session contract.

use serde::{Deserialize, Deserializer, Serialize};
use vaultline_core::{Cursor, Event};

use crate::error::VaultResult;

/// One account as returned by the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultUser {
    /// Account identifier, matched against an event's `actorUuid`.
    pub uuid: String,
    /// Display name. Missing or null reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Contact address. Missing or null reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An authenticated conversation with the vault.
///
/// Implementations hold whatever credential the backend hands out on
/// sign-in and present it on every query. Calling [`sign_in`] again on
/// a live session refreshes that credential under the same session label.
///
/// [`sign_in`]: VaultSession::sign_in
pub trait VaultSession {
    /// Authenticate, replacing any credential held so far.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VaultError::AuthenticationFailed`] when the vault
    /// rejects the account.
    fn sign_in(&mut self) -> VaultResult<()>;

    /// List every account visible to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails or cannot be parsed.
    fn list_users(&mut self) -> VaultResult<Vec<VaultUser>>;

    /// Fetch one page of audit events, newest first.
    ///
    /// [`Cursor::Unset`] starts from the newest event. [`Cursor::Before`]
    /// requests the page of events older than the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails or cannot be parsed.
    fn list_events(&mut self, cursor: &Cursor) -> VaultResult<Vec<Event>>;

    /// End the session and forget its credential. A session that never
    /// signed in has nothing to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault refuses the sign-out.
    fn sign_out(&mut self) -> VaultResult<()>;
}

impl<S: VaultSession + ?Sized> VaultSession for &mut S {
    fn sign_in(&mut self) -> VaultResult<()> {
        (**self).sign_in()
    }

    fn list_users(&mut self) -> VaultResult<Vec<VaultUser>> {
        (**self).list_users()
    }

    fn list_events(&mut self, cursor: &Cursor) -> VaultResult<Vec<Event>> {
        (**self).list_events(cursor)
    }

    fn sign_out(&mut self) -> VaultResult<()> {
        (**self).sign_out()
    }
}

impl<S: VaultSession + ?Sized> VaultSession for Box<S> {
    fn sign_in(&mut self) -> VaultResult<()> {
        (**self).sign_in()
    }

    fn list_users(&mut self) -> VaultResult<Vec<VaultUser>> {
        (**self).list_users()
    }

    fn list_events(&mut self, cursor: &Cursor) -> VaultResult<Vec<Event>> {
        (**self).list_events(cursor)
    }

    fn sign_out(&mut self) -> VaultResult<()> {
        (**self).sign_out()
    }
}
