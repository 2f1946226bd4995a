//! Parsing of `op` command output.

use serde_json::Value;
use vaultline_core::Event;

use crate::error::{VaultError, VaultResult};
use crate::session::VaultUser;

/// Parse the output of `op list users`.
///
/// # Errors
///
/// Returns [`VaultError::MalformedResponse`] if the output is not a JSON
/// array of user objects.
pub fn parse_users(stdout: &[u8]) -> VaultResult<Vec<VaultUser>> {
    if is_blank(stdout) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(stdout)
        .map_err(|e| VaultError::MalformedResponse(format!("user listing: {e}")))
}

/// Parse the output of `op list events` into one page.
///
/// Blank output is an empty page. Every element must carry a usable `eid`
/// and `time`; one bad element rejects the whole page so that the cursor
/// never skips over history it could not read.
///
/// # Errors
///
/// Returns [`VaultError::MalformedResponse`] on invalid JSON, a non-array
/// document, or an element that is not a well-formed event.
pub fn parse_events(stdout: &[u8]) -> VaultResult<Vec<Event>> {
    if is_blank(stdout) {
        return Ok(Vec::new());
    }
    let document: Value = serde_json::from_slice(stdout)
        .map_err(|e| VaultError::MalformedResponse(format!("event listing: {e}")))?;
    let Value::Array(items) = document else {
        return Err(VaultError::MalformedResponse(
            "event listing is not a JSON array".to_owned(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Event::from_vault_value(item)
                .map_err(|e| VaultError::MalformedResponse(format!("event #{index}: {e}")))
        })
        .collect()
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users() {
        let users = parse_users(
            br#"[{"uuid":"U1","name":"Alice","email":"alice@example.com","state":"A"},
                 {"uuid":"U2"}]"#,
        )
        .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Alice");
        assert_eq!(users[1].email, "");
    }

    #[test]
    fn test_parse_users_null_fields_read_as_empty() {
        let users = parse_users(br#"[{"uuid":"U1","name":null,"email":null}]"#).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].uuid, "U1");
        assert_eq!(users[0].name, "");
        assert_eq!(users[0].email, "");
    }

    #[test]
    fn test_parse_users_rejects_garbage() {
        let err = parse_users(b"not json").unwrap_err();
        assert!(matches!(err, VaultError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_events_blank_is_empty_page() {
        assert!(parse_events(b"").unwrap().is_empty());
        assert!(parse_events(b" \n").unwrap().is_empty());
        assert!(parse_events(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_events_keeps_order() {
        let page = parse_events(
            br#"[{"eid":30,"time":"2024-01-15T10:00:00Z","actorUuid":"U1"},
                 {"eid":29,"time":"2024-01-14T23:59:59-05:00"}]"#,
        )
        .unwrap();
        let ids: Vec<_> = page.iter().map(|e| e.id.as_str().to_owned()).collect();
        assert_eq!(ids, ["30", "29"]);
        assert_eq!(page[0].actor_id.as_deref(), Some("U1"));
        assert!(page[1].actor_id.is_none());
    }

    #[test]
    fn test_parse_events_rejects_object_document() {
        let err = parse_events(br#"{"eid":1}"#).unwrap_err();
        assert!(matches!(err, VaultError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_events_one_bad_element_rejects_page() {
        let err = parse_events(
            br#"[{"eid":2,"time":"2024-01-15T10:00:00Z"},{"eid":1,"time":"yesterday"}]"#,
        )
        .unwrap_err();
        match err {
            VaultError::MalformedResponse(msg) => assert!(msg.starts_with("event #1")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
