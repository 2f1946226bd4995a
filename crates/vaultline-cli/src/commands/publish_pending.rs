//! Publish-pending command - retry event files left in the cache.

use anyhow::{Context, Result, bail};
use vaultline_config::Config;
use vaultline_core::CacheLayout;
use vaultline_pipeline::publish_pending;
use vaultline_publish::Publisher;

use crate::theme::Theme;

/// Forward every event file still in the cache to the configured endpoint.
pub(crate) fn run_sweep(config: &Config) -> Result<()> {
    let Some(publisher) =
        Publisher::from_config(&config.publish).context("invalid publish endpoint")?
    else {
        bail!("no publish endpoint configured (set publish.url or --url)");
    };

    let layout = CacheLayout::from_path(&config.cache.root);
    let summary = publish_pending(&layout, &publisher).context("pending sweep failed")?;

    println!("{}", Theme::header("Pending events"));
    println!("{}", Theme::separator());
    println!("{}", Theme::kv("Endpoint", publisher.endpoint().as_str()));
    println!("{}", Theme::kv("Attempted", &summary.attempted().to_string()));
    println!("{}", Theme::kv("Delivered", &summary.delivered.to_string()));
    println!("{}", Theme::kv("Removed", &summary.removed.to_string()));

    let failed = summary.rejected.saturating_add(summary.failed);
    if failed > 0 {
        println!(
            "{}",
            Theme::warning(&format!("{failed} event(s) still pending"))
        );
    } else {
        println!("{}", Theme::success("Nothing left pending"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_endpoint() {
        let err = run_sweep(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("no publish endpoint"), "{err}");
    }
}
