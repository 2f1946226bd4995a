//! Command-line overrides, the highest-precedence layer.

use std::path::PathBuf;

use crate::types::{Comparison, Config};

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    /// `-b/--domain`.
    pub domain: Option<String>,
    /// `-m/--email`.
    pub email: Option<String>,
    /// `-s/--secret`.
    pub secret: Option<String>,
    /// `-p/--passphrase`.
    pub passphrase: Option<String>,
    /// `-d/--cache-root`.
    pub cache_root: Option<PathBuf>,
    /// `-o/--older`.
    pub older_days: Option<u32>,
    /// `--inclusive`.
    pub comparison: Option<Comparison>,
    /// `-u/--url`.
    pub publish_url: Option<String>,
    /// `-r/--remove`.
    pub remove_after_publish: Option<bool>,
    /// Derived from `-v` repetitions.
    pub log_level: Option<String>,
    /// `--log-format`.
    pub log_format: Option<String>,
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("has_secret", &self.secret.is_some())
            .field("has_passphrase", &self.passphrase.is_some())
            .field("cache_root", &self.cache_root)
            .field("older_days", &self.older_days)
            .field("comparison", &self.comparison)
            .field("publish_url", &self.publish_url)
            .field("remove_after_publish", &self.remove_after_publish)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ConfigOverrides {
    /// Write every set override into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.domain {
            v.clone_into(&mut config.vault.domain);
        }
        if let Some(v) = &self.email {
            v.clone_into(&mut config.vault.email);
        }
        if let Some(v) = &self.secret {
            v.clone_into(&mut config.vault.secret);
        }
        if let Some(v) = &self.passphrase {
            v.clone_into(&mut config.vault.passphrase);
        }
        if let Some(v) = &self.cache_root {
            config.cache.root.clone_from(v);
        }
        if let Some(v) = self.older_days {
            config.retention.older_days = v;
        }
        if let Some(v) = self.comparison {
            config.retention.comparison = v;
        }
        if let Some(v) = &self.publish_url {
            v.clone_into(&mut config.publish.url);
        }
        if let Some(v) = self.remove_after_publish {
            config.publish.remove_after_publish = v;
        }
        if let Some(v) = &self.log_level {
            v.clone_into(&mut config.logging.level);
        }
        if let Some(v) = &self.log_format {
            v.clone_into(&mut config.logging.format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [vault]
            domain = "file.1password.com"
            email = "ops@example.com"

            [retention]
            older_days = 3
        "#,
        )
        .unwrap();

        ConfigOverrides {
            domain: Some("flag.1password.com".to_owned()),
            older_days: Some(10),
            comparison: Some(Comparison::Inclusive),
            remove_after_publish: Some(true),
            ..ConfigOverrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.vault.domain, "flag.1password.com");
        assert_eq!(config.vault.email, "ops@example.com");
        assert_eq!(config.retention.older_days, 10);
        assert_eq!(config.retention.comparison, Comparison::Inclusive);
        assert!(config.publish.remove_after_publish);
    }

    #[test]
    fn test_debug_hides_secret_values() {
        let overrides = ConfigOverrides {
            secret: Some("A3-FLAG".to_owned()),
            ..ConfigOverrides::default()
        };
        assert!(!format!("{overrides:?}").contains("A3-FLAG"));
    }
}
