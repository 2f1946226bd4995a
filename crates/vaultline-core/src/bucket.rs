//! Calendar-day partitions.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::Event;

const BUCKET_FORMAT: &str = "%Y%m%d";

/// The calendar day an event belongs to, rendered as `YYYYMMDD`.
///
/// The day is taken in the offset the vault attached to the timestamp, so
/// an event at `23:10-05:00` lands on that local day, not the next UTC one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Bucket(NaiveDate);

impl Bucket {
    /// Bucket for an event.
    #[must_use]
    pub fn of(event: &Event) -> Self {
        Self(event.timestamp.date_naive())
    }

    /// Bucket for an arbitrary date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days between this bucket and `today`.
    ///
    /// Positive for past buckets; negative if the vault reports an event
    /// dated after `today`.
    #[must_use]
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        today.signed_duration_since(self.0).num_days()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BUCKET_FORMAT))
    }
}

impl FromStr for Bucket {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, BUCKET_FORMAT).map(Self)
    }
}

impl From<Bucket> for String {
    fn from(bucket: Bucket) -> Self {
        bucket.to_string()
    }
}

impl TryFrom<String> for Bucket {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
