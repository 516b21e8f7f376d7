//! Batch cleaning of the record log
//!
//! Single deterministic pass over the raw CSV: rows with an unparseable
//! message id or date are dropped, duplicates (same message id and channel
//! username) are collapsed to their first occurrence, missing text becomes
//! the empty string, usernames are trimmed and lowercased, and dates are
//! re-serialized as UTC RFC 3339. The input file is never modified.

use crate::models::Record;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the cleaning pass
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A raw log row before validation; everything is optional or stringly so
/// damaged rows can be inspected instead of aborting the pass.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    channel_username: String,
    #[serde(default)]
    message_id: String,
    #[serde(default)]
    message_text: Option<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    media_path: Option<String>,
}

/// Counters reported after a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_read: u64,
    pub rows_dropped: u64,
    pub duplicates_removed: u64,
    pub rows_written: u64,
}

/// Batch cleaner over the record log
pub struct DataCleaner {
    input: PathBuf,
    output: PathBuf,
}

impl DataCleaner {
    /// Create a cleaner reading `input` and writing the cleaned copy to
    /// `output`.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
        }
    }

    /// Run the cleaning pass.
    pub fn run(&self) -> Result<CleanStats, CleanError> {
        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            "cleaning record log"
        );

        let mut reader = csv::Reader::from_path(&self.input)?;

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.output)?;

        let mut stats = CleanStats::default();
        let mut seen: HashSet<(i64, String)> = HashSet::new();

        for row in reader.deserialize::<RawRow>() {
            stats.rows_read += 1;

            let raw = match row {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(row = stats.rows_read, error = %e, "dropping malformed row");
                    stats.rows_dropped += 1;
                    continue;
                },
            };

            let Some(cleaned) = normalize(raw) else {
                stats.rows_dropped += 1;
                continue;
            };

            if !seen.insert((cleaned.message_id, cleaned.channel_username.clone())) {
                debug!(
                    message_id = cleaned.message_id,
                    channel = %cleaned.channel_username,
                    "dropping duplicate row"
                );
                stats.duplicates_removed += 1;
                continue;
            }

            writer.serialize(&cleaned)?;
            stats.rows_written += 1;
        }

        writer.flush()?;

        info!(
            read = stats.rows_read,
            dropped = stats.rows_dropped,
            duplicates = stats.duplicates_removed,
            written = stats.rows_written,
            "cleaning pass finished"
        );

        Ok(stats)
    }
}

/// Validate and normalize one row; `None` drops it.
fn normalize(raw: RawRow) -> Option<Record> {
    let message_id: i64 = match raw.message_id.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            warn!(message_id = %raw.message_id, "dropping row with invalid message id");
            return None;
        },
    };

    let date: DateTime<Utc> = match DateTime::parse_from_rfc3339(raw.date.trim()) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(_) => {
            warn!(message_id, date = %raw.date, "dropping row with invalid date");
            return None;
        },
    };

    Some(Record {
        channel_title: raw.channel_title.trim().to_string(),
        channel_username: raw.channel_username.trim().to_lowercase(),
        message_id,
        message_text: raw.message_text.unwrap_or_default(),
        date: date.to_rfc3339(),
        media_path: raw.media_path.filter(|p| !p.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "channel_title,channel_username,message_id,message_text,date,media_path";

    fn run_cleaner(raw: &str) -> (CleanStats, String) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("records.csv");
        let output = dir.path().join("cleaned.csv");
        fs::write(&input, raw).unwrap();

        let stats = DataCleaner::new(&input, &output).run().unwrap();
        let cleaned = fs::read_to_string(&output).unwrap();
        (stats, cleaned)
    }

    #[test]
    fn test_duplicates_first_occurrence_wins() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,101,first,2024-03-05T09:30:00+00:00,\n\
             CheMed,chemed123,101,second,2024-03-05T09:31:00+00:00,\n"
        );
        let (stats, cleaned) = run_cleaner(&raw);

        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.rows_written, 1);
        assert!(cleaned.contains("first"));
        assert!(!cleaned.contains("second"));
    }

    #[test]
    fn test_same_id_different_channel_is_not_duplicate() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,101,a,2024-03-05T09:30:00+00:00,\n\
             Lobelia,lobelia4cosmetics,101,b,2024-03-05T09:30:00+00:00,\n"
        );
        let (stats, _) = run_cleaner(&raw);
        assert_eq!(stats.rows_written, 2);
        assert_eq!(stats.duplicates_removed, 0);
    }

    #[test]
    fn test_invalid_id_and_date_rows_dropped() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,not-a-number,text,2024-03-05T09:30:00+00:00,\n\
             CheMed,chemed123,102,text,yesterday,\n\
             CheMed,chemed123,103,text,2024-03-05T09:30:00+00:00,\n"
        );
        let (stats, cleaned) = run_cleaner(&raw);

        assert_eq!(stats.rows_dropped, 2);
        assert_eq!(stats.rows_written, 1);
        assert!(cleaned.contains("103"));
    }

    #[test]
    fn test_username_normalized() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,  CheMed123 ,101,text,2024-03-05T09:30:00+00:00,\n"
        );
        let (_, cleaned) = run_cleaner(&raw);
        assert!(cleaned.contains(",chemed123,"));
    }

    #[test]
    fn test_date_reserialized_as_utc() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,101,text,2024-03-05T12:30:00+03:00,\n"
        );
        let (_, cleaned) = run_cleaner(&raw);
        assert!(cleaned.contains("2024-03-05T09:30:00+00:00"));
    }

    #[test]
    fn test_missing_text_becomes_empty_string() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,101,,2024-03-05T09:30:00+00:00,\n"
        );
        let (stats, _) = run_cleaner(&raw);
        assert_eq!(stats.rows_written, 1);
    }

    #[test]
    fn test_deterministic_over_reruns() {
        let raw = format!(
            "{HEADER}\n\
             CheMed,chemed123,101,first,2024-03-05T09:30:00+00:00,\n\
             CheMed,chemed123,101,second,2024-03-05T09:31:00+00:00,\n\
             Lobelia,lobelia4cosmetics,7,x,2024-03-06T10:00:00+00:00,media/7.jpg\n"
        );
        let (stats_a, cleaned_a) = run_cleaner(&raw);
        let (stats_b, cleaned_b) = run_cleaner(&raw);

        assert_eq!(stats_a, stats_b);
        assert_eq!(cleaned_a, cleaned_b);
    }
}
