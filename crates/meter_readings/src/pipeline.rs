// Rust guideline compliant 2026-10-18

//! Wires the rule validator and batch processor onto one storage adapter.

use domain::{AccountLookup, BatchResult, Entry, ReadingHistory, ReadingStore};
use processor::MeterReadingProcessor;
use validator::RuleValidator;

use crate::adapters::log_faults::LogFaultReporter;

/// Validate and persist `entries` against `store`.
///
/// `store` backs the account lookup, the reading history, and the save side;
/// faults are logged through [`LogFaultReporter`].
pub async fn run_batch<S>(store: &S, entries: &[Entry]) -> BatchResult
where
    S: AccountLookup + ReadingHistory + ReadingStore,
{
    let validator = RuleValidator::new(store, store);
    let processor = MeterReadingProcessor::new(validator, store, LogFaultReporter::new());
    processor.process(entries).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::run_batch;
    use crate::adapters::in_memory_store::InMemoryStore;
    use crate::adapters::sqlite_store::SqliteStore;
    use crate::input::Account;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use domain::{Entry, ReadingStore as _};
    use processor::DUPLICATE_ENTRY;

    fn accounts() -> Vec<Account> {
        [2344, 2233, 8766]
            .into_iter()
            .map(|id| Account { id, first_name: "Test".to_owned(), last_name: "Account".to_owned() })
            .collect()
    }

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, 17)
            .unwrap()
            .and_hms_opt(9, 24, 0)
            .unwrap()
    }

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_accounts(&accounts());
        store
    }

    #[tokio::test]
    async fn distinct_valid_entries_are_all_saved() {
        let store = seeded();
        let entries = vec![
            Entry::new(2344, base(), "09812"),
            Entry::new(2233, base(), "54895"),
            Entry::new(8766, base(), "03256"),
        ];
        let result = run_batch(&store, &entries).await;
        assert_eq!(result.success_count, 3);
        assert!(result.errors.is_empty());
        assert_eq!(store.reading_count(), 3);
    }

    #[tokio::test]
    async fn unknown_account_is_the_only_error() {
        let store = seeded();
        let entries = vec![
            Entry::new(2344, base(), "09812"),
            Entry::new(1234, base(), "54895"),
            Entry::new(8766, base(), "03256"),
        ];
        let result = run_batch(&store, &entries).await;
        assert_eq!(result.success_count, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].entry, entries[1]);
        assert_eq!(
            result.errors[0].validation_errors,
            vec!["Property: AccountId, Message: AccountId does not exist".to_owned()]
        );
    }

    #[tokio::test]
    async fn identical_entries_are_both_rejected() {
        let store = seeded();
        let entries = vec![Entry::new(2344, base(), "12345"), Entry::new(2344, base(), "12345")];
        let result = run_batch(&store, &entries).await;
        assert_eq!(result.errors.len(), 2);
        assert!(
            result
                .errors
                .iter()
                .all(|e| e.validation_errors == vec![DUPLICATE_ENTRY.to_owned()])
        );
        assert_eq!(store.reading_count(), 0);
    }

    #[tokio::test]
    async fn readings_saved_earlier_in_the_batch_count_as_history() {
        let store = seeded();
        // Second entry is older than the first, which is saved before it is validated.
        let entries = vec![
            Entry::new(2344, base(), "00100"),
            Entry::new(2344, base() - Duration::days(1), "00090"),
        ];
        let result = run_batch(&store, &entries).await;
        assert_eq!(result.success_count, 1);
        assert_eq!(
            result.errors[0].validation_errors,
            vec![
                "Property: MeterReadingDateTime, Message: Meter Reading DateTime must be newer than the latest meter reading"
                    .to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn second_upload_of_same_file_is_rejected_by_recency() {
        let store = seeded();
        let entries = vec![Entry::new(2344, base(), "09812"), Entry::new(2233, base(), "54895")];
        let first = run_batch(&store, &entries).await;
        assert_eq!(first.success_count, 2);
        let second = run_batch(&store, &entries).await;
        assert_eq!(second.success_count, 0);
        assert_eq!(second.errors.len(), 2);
    }

    #[tokio::test]
    async fn sqlite_store_runs_the_same_pipeline() {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();
        store.add_accounts(&accounts()).await.unwrap();
        store.save_reading(&Entry::new(2344, base(), "01000")).await.unwrap();
        let entries = vec![
            Entry::new(2344, base() - Duration::days(30), "00900"),
            Entry::new(2344, base() + Duration::days(30), "01100"),
            Entry::new(2233, base(), " "),
        ];
        let result = run_batch(&store, &entries).await;
        let rejected: Vec<&Entry> = result.errors.iter().map(|e| &e.entry).collect();
        assert_eq!(rejected, vec![&entries[0], &entries[2]]);
        assert_eq!(
            result.errors[1].validation_errors,
            vec!["Property: MeterReadValue, Message: MeterReadValue cannot be empty".to_owned()]
        );
        assert_eq!(result.success_count, 1);
    }
}
