// Rust guideline compliant 2026-10-18

//! CSV input: meter readings to process and the accounts to seed.
//!
//! Readings use the header `AccountId,MeterReadingDateTime,MeterReadValue`;
//! extra columns are ignored. Rows that cannot become an [`Entry`] are
//! returned as [`SkippedRow`]s instead of failing the whole file. Accounts
//! use `AccountId,FirstName,LastName` and must be well formed.

use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use domain::Entry;
use serde::Deserialize;

/// Accepted `MeterReadingDateTime` layouts, tried in order before RFC 3339.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Errors that stop a CSV file from being read at all.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File being read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The CSV structure was invalid.
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single reading row was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// `AccountId` is not an integer.
    #[error("AccountId '{0}' is not an integer")]
    AccountId(String),
    /// `MeterReadingDateTime` matches none of the accepted layouts.
    #[error("MeterReadingDateTime '{0}' is not a recognised date and time")]
    Timestamp(String),
    /// The row does not fit the header.
    #[error("unreadable row: {0}")]
    Shape(String),
}

/// A reading row excluded from the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// What was wrong with it.
    pub reason: RowError,
}

/// Entries read from a readings file plus the rows that were skipped.
#[derive(Debug, Default)]
pub struct ReadingBatch {
    /// Convertible rows, in file order.
    pub entries: Vec<Entry>,
    /// Rows left out, in file order.
    pub skipped: Vec<SkippedRow>,
}

/// One account row of the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account id.
    #[serde(rename = "AccountId")]
    pub id: i32,
    /// Holder first name.
    #[serde(rename = "FirstName")]
    pub first_name: String,
    /// Holder last name.
    #[serde(rename = "LastName")]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(rename = "AccountId")]
    account_id: String,
    #[serde(rename = "MeterReadingDateTime")]
    reading_timestamp: String,
    #[serde(rename = "MeterReadValue", default)]
    reading_value: Option<String>,
}

/// Parse a timestamp in any of the accepted layouts.
///
/// RFC 3339 values with an offset are converted to UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

fn to_entry(raw: RawReading) -> Result<Entry, RowError> {
    let Ok(account_id) = raw.account_id.trim().parse::<i32>() else {
        return Err(RowError::AccountId(raw.account_id));
    };
    let Some(reading_timestamp) = parse_timestamp(&raw.reading_timestamp) else {
        return Err(RowError::Timestamp(raw.reading_timestamp));
    };
    Ok(Entry { account_id, reading_timestamp, reading_value: raw.reading_value })
}

/// Read meter readings from any CSV source.
///
/// The reading value is kept verbatim (no trimming) so that whitespace-only
/// values reach validation; an empty cell becomes `None`.
///
/// # Errors
///
/// Returns [`InputError::Csv`] when the header cannot be read or on an I/O
/// error mid-file.
pub fn read_readings_from<R: io::Read>(source: R) -> Result<ReadingBatch, InputError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(source);
    let headers = reader.headers()?.clone();

    let mut batch = ReadingBatch::default();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                batch.skipped.push(SkippedRow { line, reason: RowError::Shape(e.to_string()) });
                continue;
            }
        }
        let line = record.position().map_or(0, csv::Position::line);
        let converted = record
            .deserialize::<RawReading>(Some(&headers))
            .map_err(|e| RowError::Shape(e.to_string()))
            .and_then(to_entry);
        match converted {
            Ok(entry) => batch.entries.push(entry),
            Err(reason) => batch.skipped.push(SkippedRow { line, reason }),
        }
    }
    tracing::debug!(
        entries = batch.entries.len(),
        skipped = batch.skipped.len(),
        "input.readings.loaded"
    );
    Ok(batch)
}

/// Read meter readings from a CSV file.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the file cannot be opened, otherwise as
/// [`read_readings_from`].
pub fn read_readings(path: &Path) -> Result<ReadingBatch, InputError> {
    read_readings_from(open(path)?)
}

/// Read the account seed file.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the file cannot be opened and
/// [`InputError::Csv`] on the first malformed row.
pub fn read_accounts(path: &Path) -> Result<Vec<Account>, InputError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(open(path)?);
    let accounts = reader.deserialize().collect::<Result<Vec<Account>, _>>()?;
    tracing::debug!(count = accounts.len(), "input.accounts.loaded");
    Ok(accounts)
}

fn open(path: &Path) -> Result<std::fs::File, InputError> {
    std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
