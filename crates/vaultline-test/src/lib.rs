//! Vaultline Test - Shared test utilities for vaultline.
//!
//! This crate provides a scripted [`VaultSession`](vaultline_vault::VaultSession),
//! a recording [`Forwarder`](vaultline_publish::Forwarder) and event
//! fixtures for use as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vaultline_test::{MockVaultSession, test_event, test_user};
//!
//! let vault = MockVaultSession::new()
//!     .with_users([test_user("U1", "Alice")])
//!     .with_page([test_event("3", "2024-01-15T10:00:00Z", Some("U1"))]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
