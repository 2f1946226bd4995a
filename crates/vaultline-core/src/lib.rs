//! Vaultline Core - shared types for the vault event pipeline.
//!
//! This crate provides:
//! - [`Event`] and [`EventId`]: one audit record pulled from the vault
//! - [`Identity`]: a resolved actor, with fixed sentinels for misses
//! - [`Cursor`]: the backward pagination token
//! - [`Bucket`]: the calendar-day partition an event is stored under
//! - [`CacheLayout`]: the on-disk directory tree under the cache root
//!
//! # Example
//!
//! ```
//! use vaultline_core::{Bucket, Event, Identity};
//!
//! let raw = serde_json::json!({
//!     "eid": 4021,
//!     "time": "2024-03-09T23:10:00-05:00",
//!     "actorUuid": "ABCDEF",
//!     "action": "join",
//! });
//! let event = Event::from_vault_value(raw).unwrap();
//! assert_eq!(event.id.as_str(), "4021");
//! assert_eq!(Bucket::of(&event).to_string(), "20240309");
//!
//! let enriched = event.enrich(&Identity::unresolved());
//! let bytes = enriched.to_canonical_json().unwrap();
//! assert!(std::str::from_utf8(&bytes).unwrap().contains("unresolved_name"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod dirs;
pub mod prelude;

mod bucket;
mod canonical;
mod cursor;
mod error;
mod event;
mod identity;

pub use bucket::Bucket;
pub use canonical::to_canonical_json;
pub use cursor::Cursor;
pub use dirs::CacheLayout;
pub use error::{CoreError, CoreResult};
pub use event::{EnrichedEvent, Event, EventId, USER_MAIL_FIELD, USER_NAME_FIELD};
pub use identity::{Identity, UNRESOLVED_MAIL, UNRESOLVED_NAME};
