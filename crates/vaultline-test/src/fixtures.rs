//! Test fixtures for common types.

use chrono::{Duration, NaiveDate};
use serde_json::json;
use vaultline_core::Event;
use vaultline_vault::VaultUser;

/// Create an event as the vault would list it.
///
/// # Panics
///
/// Panics if `id` or `time` is not a valid event id / timestamp.
#[must_use]
pub fn test_event(id: &str, time: &str, actor: Option<&str>) -> Event {
    let mut value = json!({
        "eid": id,
        "time": time,
        "action": "read",
        "objectType": "item",
    });
    if let Some(actor) = actor {
        value["actorUuid"] = json!(actor);
    }
    Event::from_vault_value(value).expect("fixture event must be valid")
}

/// Create an event dated `days` before `today`, at noon UTC.
///
/// # Panics
///
/// Panics if the resulting date is out of range.
#[must_use]
pub fn test_event_days_ago(id: &str, today: NaiveDate, days: i64, actor: Option<&str>) -> Event {
    let date = today
        .checked_sub_signed(Duration::days(days))
        .expect("fixture date in range");
    test_event(id, &format!("{date}T12:00:00Z"), actor)
}

/// Create a page of events dated `today` with ids counting down from `newest`.
#[must_use]
pub fn test_page(newest: u32, len: u32, today: NaiveDate) -> Vec<Event> {
    (0..len)
        .map(|offset| test_event_days_ago(&newest.saturating_sub(offset).to_string(), today, 0, Some("U1")))
        .collect()
}

/// Create a vault user with an `@example.com` address.
#[must_use]
pub fn test_user(uuid: &str, name: &str) -> VaultUser {
    VaultUser {
        uuid: uuid.to_owned(),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

/// A fixed "today" for deterministic age checks.
///
/// # Panics
///
/// Never; the date is a constant.
#[must_use]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid date")
}
