// Rust guideline compliant 2026-10-18

//! Batch processor -- validates a batch of meter readings, rejects invalid and
//! duplicate entries, persists the rest, and reports the outcome.
//!
//! Entry point: [`MeterReadingProcessor::process`].

pub mod duplicates;

use domain::{
    BatchError, BatchResult, Entry, EntryValidator, FaultReporter, ProcessingFault, ReadingStore,
    ValidationFailure,
};
use tracing::Instrument as _;

use crate::duplicates::DuplicateSet;

/// Message attached to every member of a duplicate group.
pub const DUPLICATE_ENTRY: &str = "Duplicate Entries are not allowed.";

/// Render one failure as `Property: <field>, Message: <message>`.
#[must_use]
pub fn format_failure(failure: &ValidationFailure) -> String {
    format!("Property: {}, Message: {}", failure.field, failure.message)
}

/// What happened to one entry that did not fault.
#[derive(Debug, Clone, PartialEq)]
enum Disposition {
    Saved,
    Rejected(Vec<String>),
}

// ---------------------------------------------------------------------------
// MeterReadingProcessor
// ---------------------------------------------------------------------------

/// Sequential batch pipeline over the validator, store, and fault-reporter ports.
///
/// Generic over all three ports for static dispatch. Holds no per-batch
/// state, so one instance can serve any number of `process` calls.
#[derive(Debug)]
pub struct MeterReadingProcessor<V, S, F>
where
    V: EntryValidator,
    S: ReadingStore,
    F: FaultReporter,
{
    validator: V,
    store: S,
    faults: F,
}

impl<V, S, F> MeterReadingProcessor<V, S, F>
where
    V: EntryValidator,
    S: ReadingStore,
    F: FaultReporter,
{
    /// Create a processor from its three ports.
    #[must_use]
    pub fn new(validator: V, store: S, faults: F) -> Self {
        Self { validator, store, faults }
    }

    /// Process `entries` one at a time in input order.
    ///
    /// Each entry ends up saved, rejected with its validation messages, or
    /// rejected as a duplicate. Duplicates are computed over the whole input,
    /// so no member of a duplicate group is ever saved. A port failure on one
    /// entry is sent to the [`FaultReporter`] and processing moves on; such an
    /// entry is missing from `errors` and therefore counted in
    /// `success_count`, which is always `entries.len() - errors.len()`.
    pub async fn process(&self, entries: &[Entry]) -> BatchResult {
        let span = tracing::info_span!(
            "batch",
            batch_id = %uuid::Uuid::new_v4(),
            size = entries.len()
        );
        self.process_batch(entries).instrument(span).await
    }

    async fn process_batch(&self, entries: &[Entry]) -> BatchResult {
        let duplicates = DuplicateSet::detect(entries);
        if !duplicates.is_empty() {
            tracing::debug!(groups = duplicates.group_count(), "processor.duplicates.found");
        }

        let mut errors: Vec<BatchError> = vec![];
        let mut faults = 0usize;
        for entry in entries {
            match self.process_entry(entry, &duplicates).await {
                Ok(Disposition::Saved) => {
                    tracing::debug!(account_id = entry.account_id, "processor.entry.saved");
                }
                Ok(Disposition::Rejected(validation_errors)) => {
                    tracing::debug!(
                        account_id = entry.account_id,
                        reasons = validation_errors.len(),
                        "processor.entry.rejected"
                    );
                    errors.push(BatchError { entry: entry.clone(), validation_errors });
                }
                Err(fault) => {
                    faults += 1;
                    self.faults.report(entry, &fault);
                }
            }
        }

        let result = BatchResult { success_count: entries.len() - errors.len(), errors };
        tracing::info!(
            success_count = result.success_count,
            failure_count = result.failure_count(),
            faults,
            "processor.batch.done"
        );
        result
    }

    async fn process_entry(
        &self,
        entry: &Entry,
        duplicates: &DuplicateSet<'_>,
    ) -> Result<Disposition, ProcessingFault> {
        let outcome = self.validator.validate(entry).await?;
        if !outcome.is_valid() {
            return Ok(Disposition::Rejected(
                outcome.failures().iter().map(format_failure).collect(),
            ));
        }

        if duplicates.contains(entry) {
            return Ok(Disposition::Rejected(vec![DUPLICATE_ENTRY.to_owned()]));
        }

        self.store.save_reading(entry).await.map_err(ProcessingFault::Persistence)?;
        Ok(Disposition::Saved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
