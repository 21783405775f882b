// Rust guideline compliant 2026-10-18

//! In-batch duplicate detection.
//!
//! Entries are grouped by the composite key `(account_id, reading_timestamp,
//! reading_value)`. Every member of a group with more than one entry is a
//! duplicate; none of them is kept as the "original".

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use domain::Entry;

/// Grouping key borrowed from an [`Entry`]. Timestamps compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EntryKey<'a> {
    account_id: i32,
    reading_timestamp: NaiveDateTime,
    reading_value: Option<&'a str>,
}

impl<'a> EntryKey<'a> {
    fn of(entry: &'a Entry) -> Self {
        Self {
            account_id: entry.account_id,
            reading_timestamp: entry.reading_timestamp,
            reading_value: entry.reading_value(),
        }
    }
}

/// Keys that occur more than once in a batch.
#[derive(Debug, Default)]
pub struct DuplicateSet<'a> {
    keys: HashSet<EntryKey<'a>>,
}

impl<'a> DuplicateSet<'a> {
    /// Scan `entries` and keep every key seen at least twice.
    #[must_use]
    pub fn detect(entries: &'a [Entry]) -> Self {
        let mut groups: HashMap<EntryKey<'a>, usize> = HashMap::with_capacity(entries.len());
        for entry in entries {
            *groups.entry(EntryKey::of(entry)).or_default() += 1;
        }
        let keys = groups
            .into_iter()
            .filter(|&(_, members)| members > 1)
            .map(|(key, _)| key)
            .collect();
        Self { keys }
    }

    /// `true` when `entry` belongs to a duplicate group of the scanned batch.
    #[must_use]
    pub fn contains(&self, entry: &Entry) -> bool {
        self.keys.contains(&EntryKey::of(entry))
    }

    /// Number of duplicate groups (not entries).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.keys.len()
    }

    /// `true` when the batch has no duplicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
