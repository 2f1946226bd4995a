//! Environment variable fallbacks.
//!
//! Only `VAULTLINE_*` variables are consulted, once, at startup. They fill
//! fields the config file left empty and never override a file value.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::types::Config;

/// Snapshot of the relevant process environment.
pub type EnvVars = HashMap<String, String>;

/// Path of the config file when `--config` is not given.
pub const CONFIG_PATH_VAR: &str = "VAULTLINE_CONFIG";
/// Sign-in address.
pub const DOMAIN_VAR: &str = "VAULTLINE_DOMAIN";
/// Account email.
pub const EMAIL_VAR: &str = "VAULTLINE_EMAIL";
/// Account secret key.
pub const SECRET_VAR: &str = "VAULTLINE_SECRET";
/// Account passphrase.
pub const PASSPHRASE_VAR: &str = "VAULTLINE_PASSPHRASE";
/// Cache root directory.
pub const CACHE_ROOT_VAR: &str = "VAULTLINE_CACHE_ROOT";
/// Publish endpoint.
pub const PUBLISH_URL_VAR: &str = "VAULTLINE_PUBLISH_URL";

const PREFIX: &str = "VAULTLINE_";

/// Collect every `VAULTLINE_*` variable from the process environment.
#[must_use]
pub fn collect_env_vars() -> EnvVars {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(PREFIX))
        .collect()
}

/// Fill empty fields of `config` from `env`. Returns how many were filled.
///
/// The cache root only falls back when it still holds the built-in default.
pub fn apply_env_fallbacks(config: &mut Config, env: &EnvVars) -> usize {
    let mut applied = 0usize;

    let mut fill = |slot: &mut String, var: &str| {
        if slot.is_empty()
            && let Some(value) = env.get(var).filter(|v| !v.is_empty())
        {
            value.clone_into(slot);
            debug!(var, "filled config value from environment");
            applied = applied.saturating_add(1);
        }
    };

    fill(&mut config.vault.domain, DOMAIN_VAR);
    fill(&mut config.vault.email, EMAIL_VAR);
    fill(&mut config.vault.secret, SECRET_VAR);
    fill(&mut config.vault.passphrase, PASSPHRASE_VAR);
    fill(&mut config.publish.url, PUBLISH_URL_VAR);

    if config.cache == crate::types::CacheSection::default()
        && let Some(root) = env.get(CACHE_ROOT_VAR).filter(|v| !v.is_empty())
    {
        config.cache.root = PathBuf::from(root);
        debug!(var = CACHE_ROOT_VAR, "filled config value from environment");
        applied = applied.saturating_add(1);
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_env_fills_only_empty_fields() {
        let mut config = Config::default();
        config.vault.domain = "file.1password.com".to_owned();

        let applied = apply_env_fallbacks(
            &mut config,
            &env(&[
                (DOMAIN_VAR, "env.1password.com"),
                (SECRET_VAR, "A3-ENV"),
                (CACHE_ROOT_VAR, "/srv/cache"),
            ]),
        );

        assert_eq!(applied, 2);
        assert_eq!(config.vault.domain, "file.1password.com");
        assert_eq!(config.vault.secret, "A3-ENV");
        assert_eq!(config.cache.root, PathBuf::from("/srv/cache"));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        let applied = apply_env_fallbacks(&mut config, &env(&[(EMAIL_VAR, "")]));
        assert_eq!(applied, 0);
        assert!(config.vault.email.is_empty());
    }
}
