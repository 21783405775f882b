// Rust guideline compliant 2026-10-18

//! SQLite adapter for the `AccountLookup`, `ReadingHistory`, and
//! `ReadingStore` ports.
//!
//! Persists accounts and meter readings to a SQLite file via `sqlx`. The
//! schema is created on open with `CREATE TABLE IF NOT EXISTS`; there are no
//! migrations.
//!
//! # Error mapping
//!
//! Connection and query failures map to `StoreError::Unavailable`. Database
//! errors raised by an insert (constraint violations, mostly a reading for an
//! unknown account) map to `StoreError::Rejected`. The `sqlx` error is logged
//! at `error` level before mapping.

use chrono::NaiveDateTime;
use domain::{AccountLookup, Entry, ReadingHistory, ReadingStore, StoreError};

use crate::input::Account;

/// Storage adapter backed by a SQLite database via `sqlx`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: sqlx::SqlitePool,
}

impl SqliteStore {
    /// Open or create a SQLite database and initialize the schema.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` when the connection or schema creation fails.
    pub async fn new(db_url: &str) -> Result<Self, sqlx::Error> {
        // create_if_missing: sqlx 0.8 defaults to false for file databases.
        let opts = db_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = sqlx::SqlitePool::connect_with(opts).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                id         INTEGER PRIMARY KEY,
                first_name TEXT    NOT NULL,
                last_name  TEXT    NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS meter_readings (
                id                      INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id              INTEGER NOT NULL REFERENCES accounts (id),
                meter_reading_date_time TEXT    NOT NULL,
                meter_read_value        TEXT    NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Insert or refresh the given accounts.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` on the first failed insert.
    pub async fn add_accounts(&self, accounts: &[Account]) -> Result<(), sqlx::Error> {
        for account in accounts {
            sqlx::query("INSERT OR REPLACE INTO accounts (id, first_name, last_name) VALUES (?, ?, ?)")
                .bind(account.id)
                .bind(&account.first_name)
                .bind(&account.last_name)
                .execute(&self.pool)
                .await?;
        }
        tracing::debug!(count = accounts.len(), "sqlite.add_accounts");
        Ok(())
    }
}

fn unavailable(op: &str, e: &sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "sqlite.{op}");
    StoreError::Unavailable { reason: e.to_string() }
}

impl AccountLookup for SqliteStore {
    async fn account_exists(&self, account_id: i32) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable("account_exists", &e))?;
        Ok(count > 0)
    }
}

impl ReadingHistory for SqliteStore {
    async fn readings_for_account(&self, account_id: i32) -> Result<Vec<Entry>, StoreError> {
        let rows: Vec<(i32, NaiveDateTime, String)> = sqlx::query_as(
            "SELECT account_id, meter_reading_date_time, meter_read_value
             FROM meter_readings WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable("readings_for_account", &e))?;
        Ok(rows
            .into_iter()
            .map(|(account_id, when, value)| Entry::new(account_id, when, value))
            .collect())
    }
}

impl ReadingStore for SqliteStore {
    /// Insert one row into `meter_readings`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Rejected` when the database refuses the row, and
    /// `StoreError::Unavailable` for any other `sqlx` error.
    async fn save_reading(&self, entry: &Entry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO meter_readings (account_id, meter_reading_date_time, meter_read_value)
             VALUES (?, ?, ?)",
        )
        .bind(entry.account_id)
        .bind(entry.reading_timestamp)
        .bind(entry.reading_value())
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) => {
                tracing::error!(error = %db, "sqlite.save_reading");
                StoreError::Rejected { reason: db.message().to_owned() }
            }
            None => unavailable("save_reading", &e),
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::input::Account;
    use chrono::{NaiveDate, NaiveDateTime};
    use domain::{AccountLookup as _, Entry, ReadingHistory as _, ReadingStore as _, StoreError};

    // Every call opens a new pool on a fresh in-memory database, so tests are
    // isolated and leave nothing on disk.
    async fn make_store() -> SqliteStore {
        let store = SqliteStore::new("sqlite::memory:")
            .await
            .expect("in-memory SQLite should open");
        store
            .add_accounts(&[
                Account { id: 2344, first_name: "Tommy".to_owned(), last_name: "Test".to_owned() },
                Account { id: 2233, first_name: "Barry".to_owned(), last_name: "Test".to_owned() },
            ])
            .await
            .unwrap();
        store
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 4, day)
            .unwrap()
            .and_hms_opt(9, 24, 0)
            .unwrap()
    }

    // SQ-T01: seeded accounts exist, others do not.
    #[tokio::test]
    async fn account_exists_reflects_seed() {
        let store = make_store().await;
        assert!(store.account_exists(2344).await.unwrap());
        assert!(!store.account_exists(9999).await.unwrap());
    }

    // SQ-T02: saved readings come back through the history port.
    #[tokio::test]
    async fn saved_reading_is_in_history() {
        let store = make_store().await;
        let entry = Entry::new(2344, at(22), "01002");
        store.save_reading(&entry).await.unwrap();
        store.save_reading(&Entry::new(2233, at(22), "00323")).await.unwrap();
        assert_eq!(store.readings_for_account(2344).await.unwrap(), vec![entry]);
    }

    // SQ-T03: no rows means an empty history, not an error.
    #[tokio::test]
    async fn empty_history_is_ok() {
        let store = make_store().await;
        assert!(store.readings_for_account(2344).await.unwrap().is_empty());
    }

    // SQ-T04: a reading for an unknown account violates the foreign key.
    #[tokio::test]
    async fn unknown_account_is_rejected() {
        let store = make_store().await;
        let result = store.save_reading(&Entry::new(9999, at(22), "01002")).await;
        assert!(
            matches!(result, Err(StoreError::Rejected { .. })),
            "expected Rejected, got {result:?}"
        );
    }

    // SQ-T05: re-seeding the same account is idempotent.
    #[tokio::test]
    async fn add_accounts_twice_is_ok() {
        let store = make_store().await;
        store
            .add_accounts(&[Account { id: 2344, first_name: "T".to_owned(), last_name: "T".to_owned() }])
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
