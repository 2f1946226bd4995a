//! Append-only record of every event written during a run.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;
use vaultline_core::{Bucket, CacheLayout, EventId};

use crate::error::{StorageError, StorageResult};

const RUN_DATE_FORMAT: &str = "%Y%m%d";

/// One manifest line: `runDate,bucket,eventId,filePath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Date of the run that wrote the file.
    pub run_date: NaiveDate,
    /// Day partition of the event.
    pub bucket: Bucket,
    /// Vault event id.
    pub event_id: EventId,
    /// Where the event was written.
    pub file_path: PathBuf,
}

impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.run_date.format(RUN_DATE_FORMAT),
            self.bucket,
            self.event_id,
            self.file_path.display()
        )
    }
}

impl ManifestEntry {
    /// Parse one manifest line. The path is the remainder after the third
    /// comma and may itself contain commas.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed field.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let mut fields = line.splitn(4, ',');
        let mut next = |name: &str| {
            fields
                .next()
                .filter(|f| !f.is_empty())
                .ok_or_else(|| format!("missing {name}"))
        };

        let run_date = next("run date")?;
        let bucket = next("bucket")?;
        let event_id = next("event id")?;
        let file_path = next("file path")?;

        Ok(Self {
            run_date: NaiveDate::parse_from_str(run_date, RUN_DATE_FORMAT)
                .map_err(|e| format!("run date '{run_date}': {e}"))?,
            bucket: bucket
                .parse()
                .map_err(|e| format!("bucket '{bucket}': {e}"))?,
            event_id: EventId::new(event_id).map_err(|e| e.to_string())?,
            file_path: PathBuf::from(file_path),
        })
    }
}

/// The manifest file of one run date, open for appending.
///
/// Within one `ManifestLog` an event id is recorded at most once.
#[derive(Debug)]
pub struct ManifestLog {
    path: PathBuf,
    file: File,
    run_date: NaiveDate,
    recorded: HashSet<EventId>,
}

impl ManifestLog {
    /// Open (creating if needed) the manifest for `run_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory or file cannot be created.
    pub fn open(layout: &CacheLayout, run_date: NaiveDate) -> StorageResult<Self> {
        let dir = layout.log_dir();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = layout.manifest_path(run_date);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file,
            run_date,
            recorded: HashSet::new(),
        })
    }

    /// Manifest file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a stored event. Returns `false` without writing when the id
    /// was already recorded by this log.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    pub fn append(
        &mut self,
        bucket: &Bucket,
        event_id: &EventId,
        file_path: &Path,
    ) -> StorageResult<bool> {
        if self.recorded.contains(event_id) {
            debug!(event_id = %event_id, "already in manifest for this run");
            return Ok(false);
        }

        let entry = ManifestEntry {
            run_date: self.run_date,
            bucket: *bucket,
            event_id: event_id.clone(),
            file_path: file_path.to_path_buf(),
        };
        let line = format!("{entry}\n");

        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;

        self.recorded.insert(entry.event_id);
        Ok(true)
    }

    /// Number of ids recorded by this log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

/// Read every entry of a manifest file. A missing file has no entries.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed.
pub fn read_entries(path: &Path) -> StorageResult<Vec<ManifestEntry>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        },
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            ManifestEntry::parse_line(line).map_err(|reason| StorageError::ManifestParse {
                line: index.saturating_add(1),
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entry_line_format() {
        let entry = ManifestEntry {
            run_date: date(2024, 1, 16),
            bucket: Bucket::from_date(date(2024, 1, 15)),
            event_id: EventId::new("42").unwrap(),
            file_path: PathBuf::from("/cache/var/cache/20240115/42.json"),
        };
        assert_eq!(
            entry.to_string(),
            "20240116,20240115,42,/cache/var/cache/20240115/42.json"
        );
        assert_eq!(ManifestEntry::parse_line(&entry.to_string()).unwrap(), entry);
    }

    #[test]
    fn test_parse_line_keeps_commas_in_path() {
        let entry = ManifestEntry::parse_line("20240116,20240115,42,/odd,dir/42.json").unwrap();
        assert_eq!(entry.file_path, PathBuf::from("/odd,dir/42.json"));
    }

    #[test]
    fn test_parse_line_rejects_short_lines() {
        assert!(ManifestEntry::parse_line("20240116,20240115,42").is_err());
        assert!(ManifestEntry::parse_line("2024-01-16,20240115,42,/x").is_err());
    }

    #[test]
    fn test_append_once_per_id() {
        let tmp = TempDir::new().unwrap();
        let layout = CacheLayout::from_path(tmp.path());
        let mut log = ManifestLog::open(&layout, date(2024, 1, 16)).unwrap();
        let bucket = Bucket::from_date(date(2024, 1, 15));
        let id = EventId::new("42").unwrap();

        assert!(log.append(&bucket, &id, Path::new("/x/42.json")).unwrap());
        assert!(!log.append(&bucket, &id, Path::new("/x/42.json")).unwrap());
        assert_eq!(log.len(), 1);

        let entries = read_entries(log.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_id, id);
    }

    #[test]
    fn test_reopen_appends() {
        let tmp = TempDir::new().unwrap();
        let layout = CacheLayout::from_path(tmp.path());
        let bucket = Bucket::from_date(date(2024, 1, 15));
        let id = EventId::new("42").unwrap();

        for _ in 0..2 {
            let mut log = ManifestLog::open(&layout, date(2024, 1, 16)).unwrap();
            log.append(&bucket, &id, Path::new("/x/42.json")).unwrap();
        }

        let entries = read_entries(&layout.manifest_path(date(2024, 1, 16))).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_read_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        assert!(read_entries(&tmp.path().join("nope.log")).unwrap().is_empty());
    }

    #[test]
    fn test_read_reports_bad_line_number() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.log");
        fs::write(&path, "20240116,20240115,42,/x/42.json\ngarbage\n").unwrap();
        assert!(matches!(
            read_entries(&path),
            Err(StorageError::ManifestParse { line: 2, .. })
        ));
    }
}
