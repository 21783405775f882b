// Rust guideline compliant 2026-10-18

//! `FaultReporter` adapter that logs dropped entries via `tracing::error!`.

use domain::{Entry, FaultReporter, ProcessingFault};

/// Emits one error event per entry the processor had to drop.
#[derive(Debug, Default)]
pub struct LogFaultReporter;

impl LogFaultReporter {
    /// Create a new log fault reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FaultReporter for LogFaultReporter {
    fn report(&self, entry: &Entry, fault: &ProcessingFault) {
        tracing::error!(
            account_id = entry.account_id,
            entry = %entry,
            error = %fault,
            "processor.entry.fault: unexpected error processing meter reading"
        );
    }
}
