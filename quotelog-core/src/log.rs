//! Append-only CSV sample log.
//!
//! The log is the sole persistent state of a run: header row
//! `Timestamp,Stock,Price`, then one row per sample. One writer during the
//! run, one reader strictly afterward. `append` opens the file, writes a
//! single row, flushes, and closes, so a crash mid-run loses at most the
//! in-flight row and leaves prior rows intact.

use crate::sample::{Sample, TIMESTAMP_FORMAT, UNAVAILABLE_MARKER};
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The fixed three-column header, written exactly once at creation.
pub const LOG_HEADER: [&str; 3] = ["Timestamp", "Stock", "Price"];

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log {path}: {source}")]
    Create { path: PathBuf, source: csv::Error },

    #[error("failed to append to log {path}: {source}")]
    Append { path: PathBuf, source: csv::Error },

    #[error("failed to read log {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },

    #[error("log {path} has unexpected header {found:?}")]
    BadHeader { path: PathBuf, found: Vec<String> },

    #[error("malformed row {row} in {path}: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

impl LogError {
    fn create(path: &Path, source: csv::Error) -> Self {
        Self::Create {
            path: path.to_path_buf(),
            source,
        }
    }

    fn append(path: &Path, source: csv::Error) -> Self {
        Self::Append {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read(path: &Path, source: csv::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn malformed(path: &Path, row: usize, reason: String) -> Self {
        Self::MalformedRow {
            path: path.to_path_buf(),
            row,
            reason,
        }
    }
}

/// Handle to the append-only log file.
#[derive(Debug)]
pub struct SampleLog {
    path: PathBuf,
}

impl SampleLog {
    /// Create the log file and write the header row.
    ///
    /// Fails if the path is not writable. An existing file is truncated;
    /// callers use timestamped file names so that only happens when the
    /// operator asks for a colliding name.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();

        let mut wtr =
            csv::Writer::from_path(&path).map_err(|e| LogError::create(&path, e))?;
        wtr.write_record(LOG_HEADER)
            .map_err(|e| LogError::create(&path, e))?;
        wtr.flush()
            .map_err(|e| LogError::create(&path, e.into()))?;

        Ok(Self { path })
    }

    /// Append one row and close the file again.
    pub fn append(&self, sample: &Sample) -> Result<(), LogError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::append(&self.path, e.into()))?;

        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record([
            sample.timestamp_text(),
            sample.symbol.clone(),
            sample.price_text(),
        ])
        .map_err(|e| LogError::append(&self.path, e))?;
        wtr.flush()
            .map_err(|e| LogError::append(&self.path, e.into()))?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read a finalized log back into samples, validating header and rows.
pub fn read_log(path: &Path) -> Result<Vec<Sample>, LogError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| LogError::read(path, e))?;

    let headers = rdr.headers().map_err(|e| LogError::read(path, e))?.clone();
    if headers.iter().ne(LOG_HEADER) {
        return Err(LogError::BadHeader {
            path: path.to_path_buf(),
            found: headers.iter().map(String::from).collect(),
        });
    }

    let mut samples = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // 1-based file row, counting the header
        let row = i + 2;

        let record = record.map_err(|e| LogError::read(path, e))?;
        if record.len() != 3 {
            return Err(LogError::malformed(
                path,
                row,
                format!("expected 3 fields, got {}", record.len()),
            ));
        }

        let timestamp = NaiveDateTime::parse_from_str(&record[0], TIMESTAMP_FORMAT)
            .map_err(|e| {
                LogError::malformed(path, row, format!("bad timestamp '{}': {e}", &record[0]))
            })?;
        let price =
            parse_price(&record[2]).map_err(|reason| LogError::malformed(path, row, reason))?;

        samples.push(Sample::new(timestamp, &record[1], price));
    }

    Ok(samples)
}

/// Price column: the unavailable marker, or a finite non-negative decimal.
fn parse_price(text: &str) -> Result<Option<f64>, String> {
    if text == UNAVAILABLE_MARKER {
        return Ok(None);
    }
    let value: f64 = text.parse().map_err(|_| format!("bad price '{text}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("price out of range: {value}"));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_accepts_marker_and_decimals() {
        assert_eq!(parse_price("N/A").unwrap(), None);
        assert_eq!(parse_price("189.250").unwrap(), Some(189.25));
        assert_eq!(parse_price("0.000").unwrap(), Some(0.0));
    }

    #[test]
    fn parse_price_rejects_garbage() {
        assert!(parse_price("").is_err());
        assert!(parse_price("n/a").is_err());
        assert!(parse_price("-1.0").is_err());
        assert!(parse_price("NaN").is_err());
        assert!(parse_price("abc").is_err());
    }
}
