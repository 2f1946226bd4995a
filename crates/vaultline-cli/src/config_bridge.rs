//! Bridge from `vaultline_config::Config` to telemetry settings.

use vaultline_config::Config;
use vaultline_core::CacheLayout;
use vaultline_telemetry::{LogConfig, LogFormat, setup_logging};

/// File name prefix of the rolling log file.
const LOG_FILE_PREFIX: &str = "vaultline";

/// Log level selected by repeated `-v` flags, if any.
pub(crate) fn verbosity_level(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Convert the `[logging]` section into a telemetry [`LogConfig`].
pub(crate) fn to_log_config(config: &Config) -> LogConfig {
    let logging = &config.logging;
    let format = logging.format.parse().unwrap_or(LogFormat::Compact);

    let mut log_config = LogConfig::new(logging.level.clone()).with_format(format);
    for directive in &logging.directives {
        log_config = log_config.with_directive(directive.clone());
    }
    if logging.file {
        let layout = CacheLayout::from_path(&config.cache.root);
        log_config = log_config.with_file_logging(layout.log_dir(), LOG_FILE_PREFIX);
    }
    log_config
}

/// Install the global subscriber. Failure is reported and ignored.
pub(crate) fn init_logging(config: Option<&Config>, verbose: u8) {
    let log_config = match config {
        Some(config) => to_log_config(config),
        None => LogConfig::new(verbosity_level(verbose).unwrap_or("info")),
    };
    if let Err(e) = setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use vaultline_telemetry::FileLogConfig;

    use super::*;

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some("debug"));
        assert_eq!(verbosity_level(4), Some("trace"));
    }

    #[test]
    fn test_to_log_config() {
        let mut config = Config::default();
        config.cache.root = PathBuf::from("/srv/vaultline");
        config.logging.level = "warn".to_owned();
        config.logging.format = "json".to_owned();
        config.logging.directives = vec!["vaultline_vault=debug".to_owned()];
        config.logging.file = true;

        let log_config = to_log_config(&config);
        assert_eq!(log_config.level, "warn");
        assert_eq!(log_config.format, LogFormat::Json);
        assert_eq!(log_config.directives, vec!["vaultline_vault=debug"]);
        assert_eq!(
            log_config.file,
            Some(FileLogConfig {
                directory: PathBuf::from("/srv/vaultline/log"),
                prefix: "vaultline".to_owned(),
            })
        );
    }

    #[test]
    fn test_file_logging_off_by_default() {
        assert!(to_log_config(&Config::default()).file.is_none());
    }
}
