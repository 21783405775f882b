// Rust guideline compliant 2026-10-18

//! Rule-based validator for meter-reading entries.
//!
//! [`RuleValidator`] implements the `domain::EntryValidator` port by running
//! the fixed, ordered [`RULES`] list against an entry. Rules that need stored
//! data consult the injected `AccountLookup` and `ReadingHistory` adapters.

use domain::{
    AccountLookup, Entry, EntryValidator, Field, ReadingHistory, ValidationError,
    ValidationFailure, ValidationOutcome,
};

/// Message for [`Rule::AccountPositive`].
pub const ACCOUNT_NOT_POSITIVE: &str = "AccountId must be greater than 0";
/// Message for [`Rule::AccountExists`].
pub const ACCOUNT_UNKNOWN: &str = "AccountId does not exist";
/// Message for [`Rule::ReadingNewer`].
pub const READING_NOT_NEWER: &str = "Meter Reading DateTime must be newer than the latest meter reading";
/// Message for [`Rule::ValueNotEmpty`].
pub const VALUE_EMPTY: &str = "MeterReadValue cannot be empty";
/// Message for [`Rule::ValueFormat`].
pub const VALUE_BAD_FORMAT: &str = "MeterReadValue must be in the format NNNNN";

/// Number of digits a reading value must have.
const READING_DIGITS: usize = 5;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One validation rule. Each produces at most one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Account id must be strictly positive.
    AccountPositive,
    /// Account must exist in the account store.
    AccountExists,
    /// Reading must be strictly newer than every stored reading for the account.
    ReadingNewer,
    /// Reading value must be present and not blank.
    ValueNotEmpty,
    /// Reading value must be exactly five ASCII digits.
    ValueFormat,
}

/// Evaluation order. Failures are reported in this order.
pub const RULES: [Rule; 5] = [
    Rule::AccountPositive,
    Rule::AccountExists,
    Rule::ReadingNewer,
    Rule::ValueNotEmpty,
    Rule::ValueFormat,
];

impl Rule {
    /// Field this rule checks.
    #[must_use]
    pub fn field(self) -> Field {
        match self {
            Self::AccountPositive | Self::AccountExists => Field::AccountId,
            Self::ReadingNewer => Field::MeterReadingDateTime,
            Self::ValueNotEmpty | Self::ValueFormat => Field::MeterReadValue,
        }
    }

    /// Message reported when this rule fails.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::AccountPositive => ACCOUNT_NOT_POSITIVE,
            Self::AccountExists => ACCOUNT_UNKNOWN,
            Self::ReadingNewer => READING_NOT_NEWER,
            Self::ValueNotEmpty => VALUE_EMPTY,
            Self::ValueFormat => VALUE_BAD_FORMAT,
        }
    }

    /// Rule that must have passed for this one to run.
    #[must_use]
    pub fn gated_by(self) -> Option<Rule> {
        match self {
            Self::AccountExists => Some(Self::AccountPositive),
            Self::ValueFormat => Some(Self::ValueNotEmpty),
            Self::AccountPositive | Self::ReadingNewer | Self::ValueNotEmpty => None,
        }
    }

    fn failure(self) -> ValidationFailure {
        ValidationFailure { field: self.field(), message: self.message() }
    }
}

/// `true` when `value` is absent, empty, or whitespace only.
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// `true` when `value` is exactly five ASCII digits (leading zeros allowed).
#[must_use]
pub fn is_reading_format(value: &str) -> bool {
    value.len() == READING_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// RuleValidator
// ---------------------------------------------------------------------------

/// Pipeline component that implements the `domain::EntryValidator` port.
///
/// Generic over the account and history adapters. Holds no mutable state, so
/// validating the same entry against unchanged storage always gives the same
/// outcome.
#[derive(Debug)]
pub struct RuleValidator<A: AccountLookup, H: ReadingHistory> {
    accounts: A,
    history: H,
}

impl<A: AccountLookup, H: ReadingHistory> RuleValidator<A, H> {
    /// Create a validator over the given lookup adapters.
    #[must_use]
    pub fn new(accounts: A, history: H) -> Self {
        Self { accounts, history }
    }

    /// Evaluate one rule. `Ok(true)` means the rule passed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Lookup` if a storage lookup fails.
    pub async fn passes(&self, rule: Rule, entry: &Entry) -> Result<bool, ValidationError> {
        let passed = match rule {
            Rule::AccountPositive => entry.account_id > 0,
            Rule::AccountExists => self.accounts.account_exists(entry.account_id).await?,
            Rule::ReadingNewer => {
                let latest = self
                    .history
                    .readings_for_account(entry.account_id)
                    .await?
                    .into_iter()
                    .map(|r| r.reading_timestamp)
                    .max();
                latest.is_none_or(|latest| entry.reading_timestamp > latest)
            }
            Rule::ValueNotEmpty => !is_blank(entry.reading_value()),
            Rule::ValueFormat => entry.reading_value().is_some_and(is_reading_format),
        };
        Ok(passed)
    }
}

impl<A: AccountLookup, H: ReadingHistory> EntryValidator for RuleValidator<A, H> {
    /// Run every rule in [`RULES`] order and collect all failures.
    ///
    /// A rule whose gate failed is skipped, so each field reports at most one
    /// message.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Lookup` on the first failed storage lookup.
    async fn validate(&self, entry: &Entry) -> Result<ValidationOutcome, ValidationError> {
        let mut failed: Vec<Rule> = Vec::new();
        for rule in RULES {
            if let Some(gate) = rule.gated_by()
                && failed.contains(&gate)
            {
                continue;
            }
            if !self.passes(rule, entry).await? {
                failed.push(rule);
            }
        }
        tracing::debug!(
            account_id = entry.account_id,
            failures = failed.len(),
            "validator.validate"
        );
        Ok(ValidationOutcome::from_failures(
            failed.into_iter().map(Rule::failure).collect(),
        ))
    }
}
