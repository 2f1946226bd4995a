//! Init command - write an initial configuration file interactively.

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use vaultline_config::{CacheSection, InitAnswers};

use crate::theme::Theme;

/// Default location of the generated file.
pub(crate) const DEFAULT_OUTPUT: &str = "/var/tmp/vaultline.initial.toml";

/// Prompt for account details and write them to `output`.
pub(crate) fn run_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    println!();
    println!("{}", "  Let's set up vaultline.".bold());
    println!();

    let answers = prompt_answers()?;
    answers
        .write_to(output, force)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!();
    println!(
        "{}",
        Theme::success(&format!("Wrote {}", output.display()))
    );
    println!(
        "{}",
        Theme::dimmed("  The file holds your secret key and passphrase; keep it private.")
    );
    println!(
        "  Run with: vaultline --config {}",
        output.display()
    );
    Ok(())
}

fn prompt_answers() -> Result<InitAnswers> {
    let theme = ColorfulTheme::default();
    let default_root = CacheSection::default().root.display().to_string();

    let domain: String = Input::with_theme(&theme)
        .with_prompt("Sign-in address (e.g. example.1password.com)")
        .interact_text()?;
    let email: String = Input::with_theme(&theme)
        .with_prompt("Account email")
        .interact_text()?;
    let secret = Password::with_theme(&theme)
        .with_prompt("Secret key")
        .interact()?;
    let passphrase = Password::with_theme(&theme)
        .with_prompt("Passphrase")
        .interact()?;
    let cache_root: String = Input::with_theme(&theme)
        .with_prompt("Cache root directory")
        .default(default_root)
        .interact_text()?;
    let publish_url: String = Input::with_theme(&theme)
        .with_prompt("Publish endpoint URL (leave empty to skip)")
        .allow_empty(true)
        .interact_text()?;

    Ok(InitAnswers {
        domain,
        email,
        secret,
        passphrase,
        cache_root,
        publish_url,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_refuses_existing_file_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vaultline.toml");
        std::fs::write(&path, "# keep me\n").unwrap();

        let err = run_init(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"), "{err}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# keep me\n");
    }
}
