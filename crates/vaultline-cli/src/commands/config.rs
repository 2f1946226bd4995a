//! Config command - show and validate the resolved configuration.

use anyhow::{Result, bail};
use vaultline_config::Config;
use vaultline_config::validate::validate_credentials;

use crate::theme::Theme;
use crate::{GlobalArgs, resolve_config};

/// Print the resolved configuration with secrets omitted.
pub(crate) fn show(config: &Config, format: &str) -> Result<()> {
    println!("{}", render(config, format)?);
    Ok(())
}

fn render(config: &Config, format: &str) -> Result<String> {
    match format {
        "toml" => Ok(config.to_redacted_toml()?),
        // Secrets are `skip_serializing`, so JSON output is redacted too.
        "json" => Ok(serde_json::to_string_pretty(config)?),
        other => bail!("unknown format '{other}' (expected toml or json)"),
    }
}

/// Resolve the configuration and report whether it is usable for a run.
pub(crate) fn validate(global: &GlobalArgs) -> Result<()> {
    let config = match resolve_config(global) {
        Ok(config) => config,
        Err(e) => {
            println!("{}", Theme::error(&format!("{e:#}")));
            return Err(e);
        },
    };

    match validate_credentials(&config) {
        Ok(()) => {
            println!("{}", Theme::success("Configuration is valid"));
            println!("{}", Theme::kv("Cache", &config.cache.root.display().to_string()));
            println!(
                "{}",
                Theme::kv("Older than", &format!("{} day(s)", config.retention.older_days))
            );
            match config.publish.endpoint() {
                Some(url) => println!("{}", Theme::kv("Publish to", url)),
                None => println!("{}", Theme::kv("Publish to", &Theme::dimmed("(disabled)"))),
            }
            Ok(())
        },
        Err(e) => {
            println!("{}", Theme::warning(&e.to_string()));
            Err(e.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secrets() -> Config {
        let mut config = Config::default();
        config.vault.domain = "example.1password.com".to_owned();
        config.vault.secret = "A3-SECRET".to_owned();
        config.vault.passphrase = "hunter2".to_owned();
        config
    }

    #[test]
    fn test_toml_omits_secrets() {
        let out = render(&config_with_secrets(), "toml").unwrap();
        assert!(out.contains("example.1password.com"));
        assert!(!out.contains("A3-SECRET"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn test_json_omits_secrets() {
        let out = render(&config_with_secrets(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["vault"]["domain"], "example.1password.com");
        assert!(value["vault"].get("secret").is_none());
        assert!(value["vault"].get("passphrase").is_none());
    }

    #[test]
    fn test_unknown_format() {
        assert!(render(&Config::default(), "yaml").is_err());
    }
}
