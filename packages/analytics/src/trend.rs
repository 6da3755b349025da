//! Time-of-day incident trend.
//!
//! Derives an `Hour` value (0-23) from each row's `Date/Time` text and
//! counts incidents per hour. A single malformed timestamp fails the
//! whole trend rather than silently dropping the row, so the trend view
//! is either complete or absent.

use blotter_incident_models::IncidentTable;
use chrono::{NaiveDateTime, Timelike as _};

/// Errors that can occur while computing the hourly trend.
#[derive(Debug, thiserror::Error)]
pub enum TrendError {
    /// A row's `Date/Time` field could not be parsed.
    #[error("malformed timestamp in row {row}: {value:?}")]
    MalformedTimestamp {
        /// Zero-based row index.
        row: usize,
        /// The unparseable field text.
        value: String,
    },
}

/// Timestamp layouts seen in the published reports. Numeric fields are
/// not zero-padded.
const TIMESTAMP_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M", "%m/%d/%Y %H:%M:%S"];

/// Parses a report timestamp.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s.trim(), format).ok())
}

/// Extracts the hour of day (0-23) for every row.
///
/// # Errors
///
/// Returns [`TrendError::MalformedTimestamp`] naming the first row whose
/// `Date/Time` text does not parse; no partial column is produced.
pub fn hours(table: &IncidentTable) -> Result<Vec<u32>, TrendError> {
    table
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| {
            parse_timestamp(&record.date_time).map(|ts| ts.hour()).ok_or_else(|| {
                TrendError::MalformedTimestamp {
                    row,
                    value: record.date_time.clone(),
                }
            })
        })
        .collect()
}

/// Buckets per-row hours into a 24-slot count array indexed by hour.
#[must_use]
pub fn counts(hours: &[u32]) -> [u64; 24] {
    let mut counts = [0u64; 24];
    for &hour in hours {
        counts[hour as usize] += 1;
    }
    counts
}

/// Counts incidents per hour of day.
///
/// # Errors
///
/// Returns [`TrendError::MalformedTimestamp`] if any row's `Date/Time`
/// does not parse (the trend is all-or-nothing).
pub fn hourly_counts(table: &IncidentTable) -> Result<[u64; 24], TrendError> {
    Ok(counts(&hours(table)?))
}
