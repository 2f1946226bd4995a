//! Config file discovery and loading.
//!
//! 1. Pick the file: explicit path, else `$VAULTLINE_CONFIG`, else none
//! 2. Parse it over the built-in defaults
//! 3. Apply env var fallbacks for unset fields

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{CONFIG_PATH_VAR, EnvVars, apply_env_fallbacks};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration from the selected file (if any) plus env fallbacks.
///
/// The result is not validated; see [`Config::resolve`].
///
/// # Errors
///
/// Returns a [`ConfigError`] if the selected file is missing, oversized or
/// malformed.
pub fn load(path: Option<&Path>, env: &EnvVars) -> ConfigResult<Config> {
    let selected = path
        .map(Path::to_path_buf)
        .or_else(|| env.get(CONFIG_PATH_VAR).map(PathBuf::from));

    let mut config = match selected {
        Some(file) => {
            let config = load_file(&file)?;
            info!(path = %file.display(), "loaded config file");
            config
        },
        None => {
            debug!("no config file given, using defaults");
            Config::default()
        },
    };

    let env_count = apply_env_fallbacks(&mut config, env);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    Ok(config)
}

/// Load a config from a specific file path (no fallbacks, no validation).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}
