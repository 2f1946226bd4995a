//! Vaultline Publish - best-effort forwarding of persisted events.
//!
//! The local file is the retry queue: a failed or rejected delivery leaves
//! it in place for a later run or `vaultline publish-pending`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod publisher;

pub use error::{PublishError, PublishResult};
pub use publisher::{Forwarder, PublishReceipt, Publisher, USER_AGENT};
