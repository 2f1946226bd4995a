//! Vaultline Pipeline - the event download run.
//!
//! [`PaginationDriver`] ties the collaborators together:
//!
//! 1. sign in and build the [`IdentityDirectory`](vaultline_vault::IdentityDirectory)
//! 2. fetch pages newest-first, passing the oldest id seen as the cursor
//! 3. enrich, persist, record and (optionally) forward each event in order
//! 4. stop on an empty page or when an event reaches the [`AgePolicy`]
//!    threshold
//! 5. sign out
//!
//! [`publish_pending`] drains files whose earlier delivery failed.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod driver;
mod error;
mod policy;
mod sweep;

pub use driver::{PageOutcome, PaginationDriver, RunContext, RunSummary, StopReason};
pub use error::{PipelineError, PipelineResult};
pub use policy::AgePolicy;
pub use sweep::{SweepSummary, pending_files, publish_pending};
