// Rust guideline compliant 2026-10-18

//! In-memory adapter for the `AccountLookup`, `ReadingHistory`, and
//! `ReadingStore` ports.
//!
//! Intended for dry runs (`--in-memory`) and tests. Never returns an error.

use std::cell::RefCell;
use std::collections::HashSet;

use domain::{AccountLookup, Entry, ReadingHistory, ReadingStore, StoreError};

use crate::input::Account;

// ---------------------------------------------------------------------------
// Inner state
// ---------------------------------------------------------------------------

/// Known account ids and every saved reading, in save order.
#[derive(Debug, Default)]
struct InMemoryStoreInner {
    accounts: HashSet<i32>,
    readings: Vec<Entry>,
}

// ---------------------------------------------------------------------------
// InMemoryStore
// ---------------------------------------------------------------------------

/// Storage adapter backed by a `HashSet` of accounts and a `Vec` of readings.
///
/// One `RefCell` serves all three port impls; no borrow is held across an
/// `.await`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RefCell<InMemoryStoreInner>,
}

impl InMemoryStore {
    /// Create an empty store with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register accounts so that `account_exists` reports them.
    pub fn add_accounts(&self, accounts: &[Account]) {
        self.inner
            .borrow_mut()
            .accounts
            .extend(accounts.iter().map(|a| a.id));
    }

    /// Number of saved readings.
    ///
    /// Used in tests to assert persistence counts.
    #[cfg(test)]
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.inner.borrow().readings.len()
    }
}

impl AccountLookup for InMemoryStore {
    async fn account_exists(&self, account_id: i32) -> Result<bool, StoreError> {
        Ok(self.inner.borrow().accounts.contains(&account_id))
    }
}

impl ReadingHistory for InMemoryStore {
    async fn readings_for_account(&self, account_id: i32) -> Result<Vec<Entry>, StoreError> {
        Ok(self
            .inner
            .borrow()
            .readings
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect())
    }
}

impl ReadingStore for InMemoryStore {
    /// Append `entry` to the reading list.
    async fn save_reading(&self, entry: &Entry) -> Result<(), StoreError> {
        self.inner.borrow_mut().readings.push(entry.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::InMemoryStore;
    use crate::input::Account;
    use chrono::NaiveDate;
    use domain::{AccountLookup as _, Entry, ReadingHistory as _, ReadingStore as _};

    fn account(id: i32) -> Account {
        Account { id, first_name: "Tommy".to_owned(), last_name: "Test".to_owned() }
    }

    fn entry(account_id: i32, day: u32) -> Entry {
        let when = NaiveDate::from_ymd_opt(2019, 4, day)
            .unwrap()
            .and_hms_opt(9, 24, 0)
            .unwrap();
        Entry::new(account_id, when, "01002")
    }

    #[tokio::test]
    async fn only_added_accounts_exist() {
        let store = InMemoryStore::new();
        store.add_accounts(&[account(2344), account(2233)]);
        assert!(store.account_exists(2344).await.unwrap());
        assert!(store.account_exists(2233).await.unwrap());
        assert!(!store.account_exists(1).await.unwrap());
    }

    #[tokio::test]
    async fn history_is_filtered_by_account() {
        let store = InMemoryStore::new();
        store.save_reading(&entry(2344, 22)).await.unwrap();
        store.save_reading(&entry(2344, 23)).await.unwrap();
        store.save_reading(&entry(2233, 22)).await.unwrap();
        assert_eq!(store.readings_for_account(2344).await.unwrap().len(), 2);
        assert_eq!(store.readings_for_account(2233).await.unwrap(), vec![entry(2233, 22)]);
        assert!(store.readings_for_account(1).await.unwrap().is_empty());
        assert_eq!(store.reading_count(), 3);
    }
}
