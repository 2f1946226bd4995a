//! Initial config file written by `vaultline init`.
//!
//! Unlike [`Config::to_redacted_toml`](crate::Config::to_redacted_toml),
//! the initial file includes the credentials the operator typed in, so it
//! is created with owner-only permissions.

use std::io::Write;
use std::path::Path;

use toml::{Table, Value};

use crate::error::{ConfigError, ConfigResult};

/// Retention threshold written into a fresh config file.
const INITIAL_OLDER_DAYS: i64 = 3;

/// Answers collected from the operator.
#[derive(Clone, Default)]
pub struct InitAnswers {
    /// Sign-in address.
    pub domain: String,
    /// Account email.
    pub email: String,
    /// Account secret key.
    pub secret: String,
    /// Account passphrase.
    pub passphrase: String,
    /// Cache root directory.
    pub cache_root: String,
    /// Publish endpoint (may be empty).
    pub publish_url: String,
}

impl std::fmt::Debug for InitAnswers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitAnswers")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("cache_root", &self.cache_root)
            .field("publish_url", &self.publish_url)
            .finish_non_exhaustive()
    }
}

impl InitAnswers {
    /// Render the answers as a TOML config file.
    ///
    /// Values go through the TOML serializer, so quotes or newlines in an
    /// answer cannot inject extra keys.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self) -> ConfigResult<String> {
        let mut vault = Table::new();
        vault.insert("domain".into(), Value::String(self.domain.trim().to_owned()));
        vault.insert("email".into(), Value::String(self.email.trim().to_owned()));
        vault.insert("secret".into(), Value::String(self.secret.trim().to_owned()));
        vault.insert("passphrase".into(), Value::String(self.passphrase.clone()));

        let mut cache = Table::new();
        cache.insert(
            "root".into(),
            Value::String(self.cache_root.trim().to_owned()),
        );

        let mut retention = Table::new();
        retention.insert("older_days".into(), Value::Integer(INITIAL_OLDER_DAYS));

        let mut publish = Table::new();
        publish.insert(
            "url".into(),
            Value::String(self.publish_url.trim().to_owned()),
        );

        let mut root = Table::new();
        root.insert("vault".into(), Value::Table(vault));
        root.insert("cache".into(), Value::Table(cache));
        root.insert("retention".into(), Value::Table(retention));
        root.insert("publish".into(), Value::Table(publish));

        let body = toml::to_string_pretty(&root).map_err(ConfigError::SerializeError)?;
        Ok(format!("# vaultline configuration\n\n{body}"))
    }

    /// Write the rendered config to `path`.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists (without `force`) or cannot be
    /// written.
    pub fn write_to(&self, path: &Path, force: bool) -> ConfigResult<()> {
        let rendered = self.render()?;
        let write_err = |source| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        };

        let mut options = std::fs::OpenOptions::new();
        options.write(true);
        if force {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(write_err)?;
        file.write_all(rendered.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Config;

    fn answers() -> InitAnswers {
        InitAnswers {
            domain: "acme.1password.com".to_owned(),
            email: "ops@acme.test".to_owned(),
            secret: "A3-XXXX".to_owned(),
            passphrase: "pass \"with\" quotes\nand newline".to_owned(),
            cache_root: "/var/tmp/vaultline".to_owned(),
            publish_url: String::new(),
        }
    }

    #[test]
    fn test_rendered_file_loads_back() {
        let rendered = answers().render().unwrap();
        let config: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(config.vault.domain, "acme.1password.com");
        assert_eq!(config.vault.passphrase, "pass \"with\" quotes\nand newline");
        assert_eq!(config.retention.older_days, 3);
        assert!(config.publish.endpoint().is_none());
    }

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.toml");

        answers().write_to(&path, false).unwrap();
        assert!(matches!(
            answers().write_to(&path, false),
            Err(ConfigError::WriteError { .. })
        ));
        answers().write_to(&path, true).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_debug_omits_secrets() {
        let debug_str = format!("{:?}", answers());
        assert!(!debug_str.contains("A3-XXXX"));
        assert!(!debug_str.contains("quotes"));
    }
}
