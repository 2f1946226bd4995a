//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vaultline_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Records
pub use crate::{EnrichedEvent, Event, EventId, Identity};

// Pagination and partitioning
pub use crate::{Bucket, Cursor};

// Layout
pub use crate::CacheLayout;
