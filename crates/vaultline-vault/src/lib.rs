//! Vaultline Vault - the vault session contract and its `op` adapter.
//!
//! The pipeline talks to the vault only through [`VaultSession`]. The one
//! production implementation, [`OpCliSession`], runs the 1Password `op`
//! tool as a subprocess with a wall-clock limit per invocation and parses
//! its JSON output. [`IdentityDirectory`] turns the user listing into the
//! actor lookup used for enrichment.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod directory;
mod error;
mod op;
mod parse;
mod process;
mod session;

pub use directory::IdentityDirectory;
pub use error::{VaultError, VaultResult};
pub use op::{Credentials, DEFAULT_OP_PATH, OpCliSession, resolve_binary};
pub use parse::{parse_events, parse_users};
pub use session::{VaultSession, VaultUser};
