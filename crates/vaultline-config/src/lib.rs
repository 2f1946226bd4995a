#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the vaultline event downloader.
//!
//! A single [`Config`] value is built once at startup and handed to each
//! component by reference. Nothing reads configuration from the process
//! environment after [`Config::resolve`] returns.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vaultline_config::{Config, ConfigOverrides, env};
//!
//! let overrides = ConfigOverrides {
//!     older_days: Some(7),
//!     ..ConfigOverrides::default()
//! };
//! let config = Config::resolve(
//!     Some(std::path::Path::new("/etc/vaultline.toml")),
//!     &env::collect_env_vars(),
//!     &overrides,
//! )
//! .unwrap();
//! println!("caching under {}", config.cache.root.display());
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Command-line flags** ([`ConfigOverrides`])
//! 2. **Config file** (`--config`, or `$VAULTLINE_CONFIG`)
//! 3. **Environment variables** (`VAULTLINE_*`), only for fields left empty
//! 4. **Built-in defaults**

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Config file loading.
pub mod loader;
/// Command-line overrides.
pub mod overrides;
/// Initial config file rendering for `vaultline init`.
pub mod template;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use overrides::ConfigOverrides;
pub use template::InitAnswers;
pub use types::*;

impl Config {
    /// Build the effective configuration for a run.
    ///
    /// Loads the file (if any), fills empty fields from `env`, applies the
    /// command-line `overrides`, then validates the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable or malformed, or
    /// if the merged configuration fails validation.
    pub fn resolve(
        path: Option<&std::path::Path>,
        env: &env::EnvVars,
        overrides: &ConfigOverrides,
    ) -> ConfigResult<Self> {
        let mut config = loader::load(path, env)?;
        overrides.apply(&mut config);
        validate::validate(&config)?;
        Ok(config)
    }

    /// Render this configuration as TOML, with secrets omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_redacted_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }
}
