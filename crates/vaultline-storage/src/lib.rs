//! Vaultline Storage - the local system of record.
//!
//! - [`BucketStore`] writes one canonical JSON file per event under a
//!   day directory, atomically replacing any earlier copy.
//! - [`ManifestLog`] appends one `runDate,bucket,eventId,filePath` line per
//!   stored event to the manifest of the current run date.
//! - Delivery markers ([`mark_delivered`], [`is_delivered`]) tell files
//!   still waiting for the endpoint apart from delivered ones.
//! - [`RunLock`] keeps two runs from sharing a cache root at once.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod bucket_store;
mod delivery;
mod error;
mod lock;
mod manifest;

pub use bucket_store::BucketStore;
pub use delivery::{
    DELIVERED_EXTENSION, clear_delivered, delivery_marker, is_delivered, mark_delivered,
};
pub use error::{StorageError, StorageResult};
pub use lock::RunLock;
pub use manifest::{ManifestEntry, ManifestLog, read_entries};
