//! Run command - download, persist and forward vault events.

use anyhow::{Context, Result};
use tracing::debug;
use vaultline_config::Config;
use vaultline_config::validate::validate_credentials;
use vaultline_core::CacheLayout;
use vaultline_pipeline::{AgePolicy, PaginationDriver, RunContext, RunSummary, StopReason};
use vaultline_publish::Publisher;
use vaultline_vault::OpCliSession;

use crate::theme::Theme;

/// Execute one download run with the resolved configuration.
pub(crate) fn run_pipeline(config: &Config) -> Result<()> {
    validate_credentials(config)?;

    let layout = CacheLayout::from_path(&config.cache.root);
    let session = OpCliSession::from_config(&config.vault);
    let publisher = Publisher::from_config(&config.publish).context("invalid publish endpoint")?;

    let mut driver = PaginationDriver::<OpCliSession, Publisher>::new(
        session,
        layout,
        AgePolicy::from_section(&config.retention),
        RunContext::local(),
    );
    if let Some(publisher) = publisher {
        debug!(
            endpoint = %publisher.endpoint(),
            remove = publisher.removes_after_publish(),
            "forwarding enabled"
        );
        driver = driver.forward_to(publisher);
    }

    let summary = driver.run().context("run failed")?;
    print_summary(config, &summary);
    Ok(())
}

fn print_summary(config: &Config, summary: &RunSummary) {
    println!("{}", Theme::header("Run complete"));
    println!("{}", Theme::separator());
    println!("{}", Theme::kv("Cache", &config.cache.root.display().to_string()));
    println!("{}", Theme::kv("Pages", &summary.pages.to_string()));
    println!("{}", Theme::kv("Events", &summary.events.to_string()));
    println!("{}", Theme::kv("Files written", &summary.files_written.to_string()));
    if config.publish.endpoint().is_some() {
        println!("{}", Theme::kv("Published", &summary.published.to_string()));
        println!("{}", Theme::kv("Removed", &summary.removed.to_string()));
    }
    println!("{}", Theme::kv("Stopped", &describe_stop(&summary.stop)));

    if summary.publish_failures > 0 {
        println!(
            "{}",
            Theme::warning(&format!(
                "{} event(s) not delivered; retry with `vaultline publish-pending`",
                summary.publish_failures
            ))
        );
    }
}

fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::Exhausted => "no older events".to_owned(),
        StopReason::AgeThreshold {
            event_id,
            bucket,
            age_days,
        } => format!("event {event_id} from {bucket} is {age_days} day(s) old"),
    }
}

#[cfg(test)]
mod tests {
    use vaultline_core::{Bucket, EventId};

    use super::*;

    #[test]
    fn test_describe_stop() {
        assert_eq!(describe_stop(&StopReason::Exhausted), "no older events");
        let stop = StopReason::AgeThreshold {
            event_id: EventId::new("42").unwrap(),
            bucket: "20240115".parse::<Bucket>().unwrap(),
            age_days: 5,
        };
        assert_eq!(
            describe_stop(&stop),
            "event 42 from 20240115 is 5 day(s) old"
        );
    }

    #[test]
    fn test_run_requires_credentials() {
        let err = run_pipeline(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("vault.domain"), "{err}");
    }
}
