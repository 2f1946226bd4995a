//! Post-merge configuration validation.
//!
//! Validates that resolved [`Config`](crate::Config) values are within
//! acceptable ranges and that the vault credentials are present.

use crate::env;
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully-merged configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_vault(config)?;
    validate_retention(config)?;
    validate_publish(config)?;
    validate_logging(config)?;
    Ok(())
}

/// Check that every credential needed to sign in is set.
///
/// Kept separate from [`validate`] so commands that never talk to the
/// vault (`config show`, `publish-pending`) work without credentials.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] for the first empty field.
pub fn validate_credentials(config: &Config) -> ConfigResult<()> {
    let v = &config.vault;
    let required = [
        (&v.domain, "vault.domain", env::DOMAIN_VAR),
        (&v.email, "vault.email", env::EMAIL_VAR),
        (&v.secret, "vault.secret", env::SECRET_VAR),
        (&v.passphrase, "vault.passphrase", env::PASSPHRASE_VAR),
    ];

    for (value, field, env_var) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingCredential { field, env_var });
        }
    }

    Ok(())
}

fn validate_vault(config: &Config) -> ConfigResult<()> {
    let v = &config.vault;

    if v.command_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "vault.command_timeout_secs".to_owned(),
            message: "command_timeout_secs must be greater than 0".to_owned(),
        });
    }

    if v.session_name.trim().is_empty()
        || !v
            .session_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::ValidationError {
            field: "vault.session_name".to_owned(),
            message: format!(
                "session name '{}' must be non-empty and use only letters, digits, '_' or '-'",
                v.session_name
            ),
        });
    }

    Ok(())
}

/// Upper bound on the retention threshold (100 years).
const MAX_OLDER_DAYS: u32 = 36_500;

fn validate_retention(config: &Config) -> ConfigResult<()> {
    if config.retention.older_days > MAX_OLDER_DAYS {
        return Err(ConfigError::ValidationError {
            field: "retention.older_days".to_owned(),
            message: format!(
                "older_days {} exceeds the maximum of {MAX_OLDER_DAYS}",
                config.retention.older_days
            ),
        });
    }
    Ok(())
}

fn validate_publish(config: &Config) -> ConfigResult<()> {
    let p = &config.publish;

    if p.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "publish.timeout_secs".to_owned(),
            message: "timeout_secs must be greater than 0".to_owned(),
        });
    }

    if let Some(endpoint) = p.endpoint() {
        let parsed = url::Url::parse(endpoint).map_err(|e| ConfigError::ValidationError {
            field: "publish.url".to_owned(),
            message: format!("not a valid URL: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                field: "publish.url".to_owned(),
                message: format!(
                    "unsupported scheme '{}'; expected http or https",
                    parsed.scheme()
                ),
            });
        }
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !matches!(
        l.level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported level '{}'; expected one of: trace, debug, info, warn, error",
                l.level
            ),
        });
    }

    if !matches!(l.format.as_str(), "pretty" | "compact" | "json" | "full") {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{}'; expected one of: pretty, compact, json, full",
                l.format
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> Config {
        let mut config = Config::default();
        config.vault.domain = "acme.1password.com".to_owned();
        config.vault.email = "ops@acme.test".to_owned();
        config.vault.secret = "A3-XXXX".to_owned();
        config.vault.passphrase = "correct horse".to_owned();
        config
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_missing_credential_names_field() {
        let mut config = with_credentials();
        assert!(validate_credentials(&config).is_ok());

        config.vault.passphrase = "  ".to_owned();
        match validate_credentials(&config) {
            Err(ConfigError::MissingCredential { field, env_var }) => {
                assert_eq!(field, "vault.passphrase");
                assert_eq!(env_var, "VAULTLINE_PASSPHRASE");
            },
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn test_publish_url_scheme() {
        let mut config = Config::default();
        config.publish.url = "ftp://collect.example.com".to_owned();
        assert!(validate(&config).is_err());

        config.publish.url = "not a url".to_owned();
        assert!(validate(&config).is_err());

        config.publish.url = "https://collect.example.com/receiver/v1/http/abc".to_owned();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = Config::default();
        config.vault.command_timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.publish.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_session_name_charset() {
        let mut config = Config::default();
        config.vault.session_name = "event list".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_logging_values() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_older_days_bound() {
        let mut config = Config::default();
        config.retention.older_days = 40_000;
        assert!(validate(&config).is_err());
    }
}
