// Rust guideline compliant 2026-10-18

//! Shared domain types for the meter-reading ingest pipeline.
//!
//! Defines `Entry`, the validation and batch report types, the error enums,
//! and the hexagonal port traits: `AccountLookup`, `ReadingHistory`,
//! `ReadingStore`, `EntryValidator`, and `FaultReporter`.
//! All pipeline components depend on this crate.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One candidate meter reading submitted for processing.
///
/// Equality and hashing are structural over all three fields; duplicate
/// detection relies on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Account the reading belongs to. Not guaranteed positive on input.
    #[serde(rename = "accountId")]
    pub account_id: i32,
    /// When the reading was taken.
    #[serde(rename = "meterReadingDateTime")]
    pub reading_timestamp: NaiveDateTime,
    /// Raw reading text. `None` when the source had no value at all.
    #[serde(rename = "meterReadValue")]
    pub reading_value: Option<String>,
}

impl Entry {
    /// Build an entry with a present reading value.
    #[must_use]
    pub fn new(
        account_id: i32,
        reading_timestamp: NaiveDateTime,
        reading_value: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            reading_timestamp,
            reading_value: Some(reading_value.into()),
        }
    }

    /// Build an entry whose reading value is absent.
    #[must_use]
    pub fn without_value(account_id: i32, reading_timestamp: NaiveDateTime) -> Self {
        Self { account_id, reading_timestamp, reading_value: None }
    }

    /// Reading value as a string slice, if present.
    #[must_use]
    pub fn reading_value(&self) -> Option<&str> {
        self.reading_value.as_deref()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccountId = {}, MeterReadingDateTime = {}, MeterReadValue = {}",
            self.account_id,
            self.reading_timestamp,
            self.reading_value().unwrap_or_default()
        )
    }
}

/// Entry field a validation rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `Entry::account_id`.
    AccountId,
    /// `Entry::reading_timestamp`.
    MeterReadingDateTime,
    /// `Entry::reading_value`.
    MeterReadValue,
}

impl Field {
    /// Property name used in report messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AccountId => "AccountId",
            Self::MeterReadingDateTime => "MeterReadingDateTime",
            Self::MeterReadValue => "MeterReadValue",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single failed rule for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Field the failing rule belongs to.
    pub field: Field,
    /// Human-readable message.
    pub message: &'static str,
}

/// Result of validating one entry: valid when no rule failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    failures: Vec<ValidationFailure>,
}

impl ValidationOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// Outcome holding the given failures, in rule order.
    #[must_use]
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    /// `true` when no rule failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures in rule order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// `true` if some failure was already recorded for `field`.
    #[must_use]
    pub fn has_failure_for(&self, field: Field) -> bool {
        self.failures.iter().any(|f| f.field == field)
    }

    /// Messages only, in rule order.
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        self.failures.iter().map(|f| f.message).collect()
    }
}

/// A rejected entry and the reasons it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    /// The entry as submitted.
    pub entry: Entry,
    /// One string per failed rule, or the duplicate message.
    #[serde(rename = "validationErrors")]
    pub validation_errors: Vec<String>,
}

/// Report for one processed batch.
///
/// `success_count` is `total - errors.len()`; entries dropped by an
/// unexpected fault are counted here as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Entries not reported as errors.
    #[serde(rename = "successCount")]
    pub success_count: usize,
    /// Rejected entries in input order.
    pub errors: Vec<BatchError>,
}

impl BatchResult {
    /// Number of rejected entries.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }
}

/// Errors from the storage-backed ports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description.
        reason: String,
    },
    /// The store refused the write (constraint violation and similar).
    #[error("write rejected: {reason}")]
    Rejected {
        /// Human-readable description.
        reason: String,
    },
}

/// Errors raised while validating an entry, as opposed to rule failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// An account or history lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(#[from] StoreError),
}

/// An unexpected per-entry failure swallowed by the batch processor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessingFault {
    /// Validation could not be completed.
    #[error("validation fault: {0}")]
    Validation(#[from] ValidationError),
    /// The save call failed.
    #[error("persistence fault: {0}")]
    Persistence(StoreError),
}

/// Hexagonal port: account existence check.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AccountLookup {
    /// Return whether an account with `account_id` exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the lookup cannot be performed.
    async fn account_exists(&self, account_id: i32) -> Result<bool, StoreError>;
}

/// Hexagonal port: prior readings for an account.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait ReadingHistory {
    /// Return every persisted reading for `account_id`, in any order.
    ///
    /// An empty vector means the account has no history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the query fails.
    async fn readings_for_account(&self, account_id: i32) -> Result<Vec<Entry>, StoreError>;
}

/// Hexagonal port: durable storage of validated readings.
///
/// The processor depends exclusively on this trait -- never on a concrete adapter.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait ReadingStore {
    /// Persist one validated reading.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` or `StoreError::Rejected` when the
    /// write does not succeed.
    async fn save_reading(&self, entry: &Entry) -> Result<(), StoreError>;
}

/// Hexagonal port: per-entry validation.
///
/// Implemented by the rule validator; mocked in processor tests.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait EntryValidator {
    /// Evaluate every rule against `entry`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Lookup` when a port the rules depend on fails.
    async fn validate(&self, entry: &Entry) -> Result<ValidationOutcome, ValidationError>;
}

/// Hexagonal port: sink for swallowed per-entry faults.
pub trait FaultReporter {
    /// Record that `entry` was dropped because of `fault`.
    fn report(&self, entry: &Entry, fault: &ProcessingFault);
}

// One storage adapter usually backs several ports at once; these impls let
// the validator and the processor each hold a shared reference to it.

impl<T: AccountLookup> AccountLookup for &T {
    async fn account_exists(&self, account_id: i32) -> Result<bool, StoreError> {
        (**self).account_exists(account_id).await
    }
}

impl<T: ReadingHistory> ReadingHistory for &T {
    async fn readings_for_account(&self, account_id: i32) -> Result<Vec<Entry>, StoreError> {
        (**self).readings_for_account(account_id).await
    }
}

impl<T: ReadingStore> ReadingStore for &T {
    async fn save_reading(&self, entry: &Entry) -> Result<(), StoreError> {
        (**self).save_reading(entry).await
    }
}

impl<T: EntryValidator> EntryValidator for &T {
    async fn validate(&self, entry: &Entry) -> Result<ValidationOutcome, ValidationError> {
        (**self).validate(entry).await
    }
}

impl<T: FaultReporter> FaultReporter for &T {
    fn report(&self, entry: &Entry, fault: &ProcessingFault) {
        (**self).report(entry, fault);
    }
}
