//! Manifest command - list what a run date wrote.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use vaultline_config::Config;
use vaultline_core::CacheLayout;
use vaultline_storage::read_entries;

use crate::theme::Theme;

/// Print the manifest entries for `date` (`YYYYMMDD`, default today).
pub(crate) fn print_manifest(config: &Config, date: Option<&str>) -> Result<()> {
    let run_date = parse_run_date(date)?;
    let layout = CacheLayout::from_path(&config.cache.root);
    let path = layout.manifest_path(run_date);
    let entries = read_entries(&path)?;

    println!(
        "{}",
        Theme::header(&format!("Manifest {}", run_date.format("%Y-%m-%d")))
    );
    println!("{}", Theme::dimmed(&path.display().to_string()));
    println!("{}", Theme::separator());

    if entries.is_empty() {
        println!("{}", Theme::info("No events recorded"));
        return Ok(());
    }
    for entry in &entries {
        println!(
            "  {}  {:<12}  {}",
            entry.bucket,
            entry.event_id.to_string(),
            Theme::dimmed(&entry.file_path.display().to_string())
        );
    }
    println!();
    println!("{}", Theme::info(&format!("{} event(s)", entries.len())));
    Ok(())
}

fn parse_run_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y%m%d")
            .with_context(|| format!("invalid date '{raw}' (expected YYYYMMDD)")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_date() {
        assert_eq!(
            parse_run_date(Some("20240115")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_run_date(Some("2024-01-15")).is_err());
        assert!(parse_run_date(Some("20241315")).is_err());
        assert!(parse_run_date(None).is_ok());
    }
}
