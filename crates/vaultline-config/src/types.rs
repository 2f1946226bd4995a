//! Configuration types.
//!
//! Every struct implements [`Default`] so that a partial TOML file (or none
//! at all) produces a complete configuration. Credentials default to empty
//! and are checked by [`crate::validate`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault account and CLI settings.
    pub vault: VaultSection,
    /// Local event cache.
    pub cache: CacheSection,
    /// Age threshold that ends pagination.
    pub retention: RetentionSection,
    /// Remote forwarding.
    pub publish: PublishSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// VaultSection
// ---------------------------------------------------------------------------

/// Vault account credentials and `op` invocation settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    /// Sign-in address, e.g. `example.1password.com`.
    pub domain: String,
    /// Account email.
    pub email: String,
    /// Account secret key. Never serialized back out.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Account passphrase. Never serialized back out.
    #[serde(skip_serializing)]
    pub passphrase: String,
    /// Explicit path to the `op` binary. Looked up on `PATH` when unset.
    pub binary: Option<PathBuf>,
    /// Shorthand the session is registered under, so repeated sign-ins
    /// reuse one logical session.
    pub session_name: String,
    /// Wall-clock limit for each `op` invocation.
    pub command_timeout_secs: u64,
}

impl std::fmt::Debug for VaultSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSection")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("has_secret", &!self.secret.is_empty())
            .field("has_passphrase", &!self.passphrase.is_empty())
            .field("binary", &self.binary)
            .field("session_name", &self.session_name)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            domain: String::new(),
            email: String::new(),
            secret: String::new(),
            passphrase: String::new(),
            binary: None,
            session_name: "eventlist".to_owned(),
            command_timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheSection
// ---------------------------------------------------------------------------

/// Where persisted events, manifests and logs live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Cache root directory.
    pub root: PathBuf,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/var/tmp/vaultline"),
        }
    }
}

// ---------------------------------------------------------------------------
// RetentionSection
// ---------------------------------------------------------------------------

/// How an event's age is compared against `older_days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Stop once an event is strictly older than the threshold (`>`).
    #[default]
    Strict,
    /// Stop once an event reaches the threshold (`>=`).
    Inclusive,
}

/// Age threshold that ends a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSection {
    /// Maximum event age, in days, that is still collected.
    pub older_days: u32,
    /// Boundary handling for `older_days`.
    pub comparison: Comparison,
}

impl Default for RetentionSection {
    fn default() -> Self {
        Self {
            older_days: 1,
            comparison: Comparison::Strict,
        }
    }
}

// ---------------------------------------------------------------------------
// PublishSection
// ---------------------------------------------------------------------------

/// Remote ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSection {
    /// HTTP(S) endpoint receiving one POST per event. Empty disables
    /// forwarding.
    pub url: String,
    /// Delete the local file after the endpoint answers 200.
    pub remove_after_publish: bool,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl PublishSection {
    /// The endpoint, if forwarding is enabled.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            remove_after_publish: false,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["vaultline_vault=trace"]`).
    pub directives: Vec<String>,
    /// Also write a daily log file under `<cache_root>/log/`.
    pub file: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [vault]
            domain = "acme.1password.com"

            [retention]
            comparison = "inclusive"
        "#,
        )
        .unwrap();

        assert_eq!(config.vault.domain, "acme.1password.com");
        assert_eq!(config.vault.session_name, "eventlist");
        assert_eq!(config.retention.older_days, 1);
        assert_eq!(config.retention.comparison, Comparison::Inclusive);
        assert_eq!(config.cache.root, PathBuf::from("/var/tmp/vaultline"));
        assert!(config.publish.endpoint().is_none());
    }

    #[test]
    fn test_vault_debug_redacts_secrets() {
        let mut vault = VaultSection::default();
        vault.secret = "A3-SECRET-KEY".to_owned();
        vault.passphrase = "hunter2".to_owned();

        let debug_str = format!("{vault:?}");
        assert!(!debug_str.contains("A3-SECRET-KEY"));
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("has_secret: true"));
    }

    #[test]
    fn test_serialize_omits_secrets() {
        let mut config = Config::default();
        config.vault.secret = "A3-SECRET-KEY".to_owned();
        config.vault.passphrase = "hunter2".to_owned();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("A3-SECRET-KEY"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("passphrase"));
    }

    #[test]
    fn test_endpoint_trims_blank() {
        let mut publish = PublishSection::default();
        publish.url = "   ".to_owned();
        assert!(publish.endpoint().is_none());
        publish.url = "https://collect.example.com/receiver".to_owned();
        assert_eq!(
            publish.endpoint(),
            Some("https://collect.example.com/receiver")
        );
    }
}
