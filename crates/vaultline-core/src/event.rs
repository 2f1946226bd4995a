//! Vault audit events and their enriched, persisted form.
//!
//! An [`Event`] is the parsed view of one object from `op list events`.
//! The original vault object is kept verbatim in [`Event::payload`]; the
//! pipeline only reads `eid`, `time` and `actorUuid` out of it.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bucket::Bucket;
use crate::canonical::to_canonical_json;
use crate::error::{CoreError, CoreResult};
use crate::identity::Identity;

/// Field added to every persisted event holding the actor's display name.
pub const USER_NAME_FIELD: &str = "user_name";
/// Field added to every persisted event holding the actor's contact address.
pub const USER_MAIL_FIELD: &str = "user_mail";

const EID_FIELD: &str = "eid";
const TIME_FIELD: &str = "time";
const ACTOR_FIELD: &str = "actorUuid";

/// Stable identifier of a vault event.
///
/// Doubles as the file name of the persisted event, so ids that could
/// escape the bucket directory are rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Create an event id, validating that it is usable as a file name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEventId`] for empty ids or ids containing
    /// path separators, `..` or NUL bytes.
    pub fn new(id: impl Into<String>) -> CoreResult<Self> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("empty")
        } else if id.contains(['/', '\\', '\0']) {
            Some("contains a path separator or NUL")
        } else if id.contains("..") {
            Some("contains `..`")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidEventId { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// The id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for this event inside its bucket directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl TryFrom<String> for EventId {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One audit record as returned by the vault.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Vault event id (`eid`).
    pub id: EventId,
    /// When the event happened (`time`), in the offset the vault reported.
    pub timestamp: DateTime<FixedOffset>,
    /// Actor who caused the event (`actorUuid`), if any.
    pub actor_id: Option<String>,
    /// The full vault object, passed through unmodified.
    pub payload: Map<String, Value>,
}

impl Event {
    /// Parse one element of the vault's event listing.
    ///
    /// `eid` may be a string or an integer. `actorUuid` may be missing or
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or if `eid`/`time`
    /// are missing or unusable.
    pub fn from_vault_value(value: Value) -> CoreResult<Self> {
        let Value::Object(payload) = value else {
            return Err(CoreError::NotAnObject);
        };

        let id = match payload.get(EID_FIELD) {
            Some(Value::String(s)) => EventId::new(s.clone())?,
            Some(Value::Number(n)) => EventId::new(n.to_string())?,
            _ => return Err(CoreError::MissingField { field: EID_FIELD }),
        };

        let timestamp = match payload.get(TIME_FIELD) {
            Some(Value::String(s)) => parse_timestamp(s)?,
            _ => return Err(CoreError::MissingField { field: TIME_FIELD }),
        };

        let actor_id = payload
            .get(ACTOR_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Ok(Self {
            id,
            timestamp,
            actor_id,
            payload,
        })
    }

    /// Attach the resolved actor to a copy of this event.
    #[must_use]
    pub fn enrich(&self, identity: &Identity) -> EnrichedEvent {
        let mut record = self.payload.clone();
        record.insert(
            USER_NAME_FIELD.to_owned(),
            Value::String(identity.name.clone()),
        );
        record.insert(
            USER_MAIL_FIELD.to_owned(),
            Value::String(identity.contact.clone()),
        );

        EnrichedEvent {
            id: self.id.clone(),
            bucket: Bucket::of(self),
            record,
        }
    }
}

/// An event with its actor resolved, ready to be written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEvent {
    /// Vault event id.
    pub id: EventId,
    /// Day partition derived from the event timestamp.
    pub bucket: Bucket,
    /// Vault payload plus `user_name` / `user_mail`.
    pub record: Map<String, Value>,
}

impl EnrichedEvent {
    /// Serialize the record in its canonical on-disk form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_canonical_json(&self) -> CoreResult<Vec<u8>> {
        to_canonical_json(&Value::Object(self.record.clone()))
    }
}

/// Parse a vault timestamp.
///
/// RFC 3339 is the normal form. Timestamps without an offset are taken
/// to be UTC.
fn parse_timestamp(raw: &str) -> CoreResult<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| CoreError::InvalidTimestamp {
            value: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids() {
        let numeric = Event::from_vault_value(json!({
            "eid": 77,
            "time": "2024-01-02T03:04:05Z",
        }))
        .unwrap();
        assert_eq!(numeric.id.as_str(), "77");

        let text = Event::from_vault_value(json!({
            "eid": "X7YZ",
            "time": "2024-01-02T03:04:05Z",
        }))
        .unwrap();
        assert_eq!(text.id.as_str(), "X7YZ");
        assert_eq!(text.id.file_name(), "X7YZ.json");
    }

    #[test]
    fn test_missing_fields_rejected() {
        let no_eid = Event::from_vault_value(json!({ "time": "2024-01-02T03:04:05Z" }));
        assert!(matches!(
            no_eid,
            Err(CoreError::MissingField { field: "eid" })
        ));

        let no_time = Event::from_vault_value(json!({ "eid": 1 }));
        assert!(matches!(
            no_time,
            Err(CoreError::MissingField { field: "time" })
        ));

        assert!(matches!(
            Event::from_vault_value(json!([1, 2])),
            Err(CoreError::NotAnObject)
        ));
    }

    #[test]
    fn test_path_like_ids_rejected() {
        for bad in ["", "../etc", "a/b", "a\\b", "nul\0"] {
            assert!(EventId::new(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(EventId::new("abc-123_x").is_ok());
    }

    #[test]
    fn test_timestamp_keeps_offset() {
        let event = Event::from_vault_value(json!({
            "eid": 1,
            "time": "2024-03-09T23:10:00-05:00",
        }))
        .unwrap();
        assert_eq!(event.timestamp.offset().local_minus_utc(), -18_000);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let event = Event::from_vault_value(json!({
            "eid": 1,
            "time": "2024-03-09T23:10:00.250",
        }))
        .unwrap();
        assert_eq!(event.timestamp.offset().local_minus_utc(), 0);

        let bad = Event::from_vault_value(json!({ "eid": 1, "time": "yesterday" }));
        assert!(matches!(bad, Err(CoreError::InvalidTimestamp { .. })));
    }

    #[test]
    fn test_null_actor_is_absent() {
        let event = Event::from_vault_value(json!({
            "eid": 1,
            "time": "2024-03-09T23:10:00Z",
            "actorUuid": null,
        }))
        .unwrap();
        assert!(event.actor_id.is_none());
    }

    #[test]
    fn test_enrich_leaves_original_untouched() {
        let event = Event::from_vault_value(json!({
            "eid": 5,
            "time": "2024-03-09T23:10:00Z",
            "actorUuid": "U1",
            "action": "signin",
        }))
        .unwrap();

        let enriched = event.enrich(&Identity::new("Ada", "ada@example.com"));
        assert_eq!(enriched.record["user_name"], "Ada");
        assert_eq!(enriched.record["user_mail"], "ada@example.com");
        assert_eq!(enriched.record["action"], "signin");
        assert!(!event.payload.contains_key("user_name"));
    }
}
