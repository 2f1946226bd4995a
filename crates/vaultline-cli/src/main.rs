//! Vaultline CLI - download the vault audit-event stream.
//!
//! Pages backwards through the vault's audit events, enriches each with the
//! acting user, stores it under a per-day cache directory and optionally
//! forwards it to an ingestion endpoint.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use vaultline_config::{Comparison, Config, ConfigOverrides, env};

mod commands;
mod config_bridge;
mod theme;

use commands::{config, init, manifest, publish_pending, run};

/// Vaultline - vault audit-event downloader
#[derive(Parser)]
#[command(name = "vaultline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings that override the config file.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, env = "VAULTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Vault sign-in address (e.g. example.1password.com)
    #[arg(short = 'b', long, global = true)]
    domain: Option<String>,

    /// Account email
    #[arg(short = 'm', long, global = true)]
    email: Option<String>,

    /// Account secret key
    #[arg(short, long, global = true)]
    secret: Option<String>,

    /// Account passphrase
    #[arg(short, long, global = true)]
    passphrase: Option<String>,

    /// Cache root directory
    #[arg(short = 'd', long, global = true)]
    cache_root: Option<PathBuf>,

    /// Stop once events are older than this many days
    #[arg(short, long, global = true)]
    older: Option<u32>,

    /// Publish endpoint URL
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Delete event files after the endpoint accepts them
    #[arg(short, long, global = true)]
    remove: bool,

    /// Stop at events exactly `--older` days old, not only older ones
    #[arg(long, global = true)]
    inclusive: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format: pretty, compact, json or full
    #[arg(long, global = true)]
    log_format: Option<String>,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            domain: self.domain.clone(),
            email: self.email.clone(),
            secret: self.secret.clone(),
            passphrase: self.passphrase.clone(),
            cache_root: self.cache_root.clone(),
            older_days: self.older,
            comparison: self.inclusive.then_some(Comparison::Inclusive),
            publish_url: self.url.clone(),
            remove_after_publish: self.remove.then_some(true),
            log_level: config_bridge::verbosity_level(self.verbose).map(str::to_owned),
            log_format: self.log_format.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Download events (the default when no command is given)
    Run,

    /// Write an initial configuration file interactively
    Init {
        /// Where to write the file
        #[arg(long, default_value = init::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// View and check configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print the manifest of a run date
    Manifest {
        /// Run date as YYYYMMDD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Forward event files left behind by failed publishes
    PublishPending,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration, secrets omitted
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Validate the resolved configuration
    Validate,
}

pub(crate) fn resolve_config(global: &GlobalArgs) -> Result<Config> {
    Config::resolve(
        global.config.as_deref(),
        &env::collect_env_vars(),
        &global.overrides(),
    )
    .context("invalid configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Onboarding runs before any config file exists.
    if let Some(Commands::Init { output, force }) = &cli.command {
        config_bridge::init_logging(None, cli.global.verbose);
        return init::run_init(output, *force);
    }

    if let Some(Commands::Config {
        command: ConfigCommands::Validate,
    }) = &cli.command
    {
        return config::validate(&cli.global);
    }

    let config = resolve_config(&cli.global)?;
    config_bridge::init_logging(Some(&config), cli.global.verbose);

    match cli.command {
        None | Some(Commands::Run) => run::run_pipeline(&config)?,
        Some(Commands::Config {
            command: ConfigCommands::Show { format },
        }) => config::show(&config, &format)?,
        Some(Commands::Manifest { date }) => manifest::print_manifest(&config, date.as_deref())?,
        Some(Commands::PublishPending) => publish_pending::run_sweep(&config)?,
        Some(Commands::Init { .. } | Commands::Config { .. }) => {},
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_defaults_to_run() {
        let cli = Cli::try_parse_from(["vaultline"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_short_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "vaultline",
            "-b",
            "example.1password.com",
            "-m",
            "ops@example.com",
            "-s",
            "A3-SECRET",
            "-p",
            "hunter2",
            "-d",
            "/srv/cache",
            "-o",
            "7",
            "-u",
            "https://ingest.example.com/",
            "-r",
            "--inclusive",
            "-vv",
        ])
        .unwrap();

        let overrides = cli.global.overrides();
        assert_eq!(overrides.domain.as_deref(), Some("example.1password.com"));
        assert_eq!(overrides.email.as_deref(), Some("ops@example.com"));
        assert_eq!(overrides.secret.as_deref(), Some("A3-SECRET"));
        assert_eq!(overrides.passphrase.as_deref(), Some("hunter2"));
        assert_eq!(overrides.cache_root, Some(PathBuf::from("/srv/cache")));
        assert_eq!(overrides.older_days, Some(7));
        assert_eq!(overrides.comparison, Some(Comparison::Inclusive));
        assert_eq!(
            overrides.publish_url.as_deref(),
            Some("https://ingest.example.com/")
        );
        assert_eq!(overrides.remove_after_publish, Some(true));
        assert_eq!(overrides.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let cli = Cli::try_parse_from(["vaultline", "run"]).unwrap();
        let overrides = cli.global.overrides();
        assert!(overrides.comparison.is_none());
        assert!(overrides.remove_after_publish.is_none());
        assert!(overrides.log_level.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vaultline", "manifest", "--date", "20240115", "-v"]).unwrap();
        assert_eq!(cli.global.verbose, 1);
        assert!(matches!(
            cli.command,
            Some(Commands::Manifest { date: Some(ref d) }) if d == "20240115"
        ));
    }
}
