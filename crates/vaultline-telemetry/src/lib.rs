//! Vaultline Telemetry - logging setup for the vaultline pipeline.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats
//! - Console output with an optional daily log file alongside
//! - Integration with the tracing ecosystem
//!
//! # Example
//!
//! ```rust,no_run
//! use vaultline_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), vaultline_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("vaultline_vault=trace")
//!     .with_file_logging("/var/tmp/vaultline/log", "vaultline");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{FileLogConfig, LogConfig, LogFormat, LogTarget, setup_logging};
