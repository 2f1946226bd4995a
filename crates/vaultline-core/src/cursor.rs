//! Backward pagination cursor.

use std::fmt;

use crate::event::EventId;

/// Position in the vault's event history.
///
/// `Unset` asks the vault for its newest page. `Before(id)` asks for the
/// page of events older than `id`, where `id` is the oldest event seen in
/// the previous page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Start from the newest event.
    #[default]
    Unset,
    /// Continue with events older than this one.
    Before(EventId),
}

impl Cursor {
    /// Whether this cursor starts from the newest event.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The id the next page must be older than, if any.
    #[must_use]
    pub fn event_id(&self) -> Option<&EventId> {
        match self {
            Self::Unset => None,
            Self::Before(id) => Some(id),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("UNSET"),
            Self::Before(id) => write!(f, "{id}"),
        }
    }
}
