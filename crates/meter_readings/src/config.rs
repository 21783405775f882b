// Rust guideline compliant 2026-10-18

//! Command line and runtime configuration.
//!
//! [`Cli`] is parsed by `clap`; [`Cli::into_config`] feeds it through
//! [`UploadConfig::builder`], which performs all validation.

use std::path::PathBuf;

use clap::Parser;

/// Database used when neither `--db-url` nor `METER_DB_URL` is given.
pub const DEFAULT_DB_URL: &str = "sqlite:meter_readings.db";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while building an [`UploadConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The supplied configuration is invalid.
    #[error("invalid upload configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Cli
// ---------------------------------------------------------------------------

/// Validate a CSV batch of meter readings and store the accepted ones.
#[derive(Debug, Parser)]
#[command(name = "meter_readings", version)]
pub struct Cli {
    /// Meter readings CSV (`AccountId,MeterReadingDateTime,MeterReadValue`).
    pub input: PathBuf,

    /// SQLite database URL.
    #[arg(long, env = "METER_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Accounts CSV (`AccountId,FirstName,LastName`) loaded before processing.
    #[arg(long)]
    pub accounts: Option<PathBuf>,

    /// Write the JSON batch report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of SQLite.
    #[arg(long)]
    pub in_memory: bool,
}

impl Cli {
    /// Convert parsed arguments into a validated [`UploadConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] as described on
    /// [`UploadConfigBuilder::build`].
    pub fn into_config(self) -> Result<UploadConfig, ConfigError> {
        let mut builder = UploadConfig::builder(self.input)
            .db_url(self.db_url)
            .in_memory(self.in_memory);
        if let Some(accounts) = self.accounts {
            builder = builder.accounts(accounts);
        }
        if let Some(report) = self.report {
            builder = builder.report(report);
        }
        builder.build()
    }
}

// ---------------------------------------------------------------------------
// UploadConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for one upload run.
///
/// Construct via [`UploadConfig::builder`].
#[derive(Debug)]
pub struct UploadConfig {
    /// Meter readings CSV to process.
    pub input: PathBuf,
    /// SQLite database URL; unused when `in_memory` is set.
    pub db_url: String,
    /// Optional accounts CSV to seed before processing.
    pub accounts: Option<PathBuf>,
    /// Optional JSON report destination.
    pub report: Option<PathBuf>,
    /// Use the in-memory store.
    pub in_memory: bool,
}

/// Builder for [`UploadConfig`].
///
/// Obtain via [`UploadConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct UploadConfigBuilder {
    input: PathBuf,
    db_url: String,
    accounts: Option<PathBuf>,
    report: Option<PathBuf>,
    in_memory: bool,
}

impl UploadConfig {
    /// Create a builder. `input` is the only required parameter.
    ///
    /// Default values: `db_url = DEFAULT_DB_URL`, no accounts, no report,
    /// `in_memory = false`.
    #[must_use]
    pub fn builder(input: impl Into<PathBuf>) -> UploadConfigBuilder {
        UploadConfigBuilder {
            input: input.into(),
            db_url: DEFAULT_DB_URL.to_owned(),
            accounts: None,
            report: None,
            in_memory: false,
        }
    }
}

impl UploadConfigBuilder {
    /// Override the SQLite database URL.
    #[must_use]
    pub fn db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = db_url.into();
        self
    }

    /// Seed accounts from this CSV before processing.
    #[must_use]
    pub fn accounts(mut self, path: impl Into<PathBuf>) -> Self {
        self.accounts = Some(path.into());
        self
    }

    /// Write the JSON report to this path.
    #[must_use]
    pub fn report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }

    /// Select the in-memory store.
    #[must_use]
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] when `db_url` is blank for a
    /// SQLite run, when an in-memory run has no accounts file (every entry
    /// would fail the existence rule), or when the report would overwrite the
    /// input.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<UploadConfig, ConfigError> {
        if !self.in_memory && self.db_url.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                reason: "db_url must not be empty".to_owned(),
            });
        }
        if self.in_memory && self.accounts.is_none() {
            return Err(ConfigError::InvalidConfig {
                reason: "an in-memory run needs an accounts file".to_owned(),
            });
        }
        if self.report.as_ref() == Some(&self.input) {
            return Err(ConfigError::InvalidConfig {
                reason: "report path must differ from the input path".to_owned(),
            });
        }
        Ok(UploadConfig {
            input: self.input,
            db_url: self.db_url,
            accounts: self.accounts,
            report: self.report,
            in_memory: self.in_memory,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = UploadConfig::builder("readings.csv").build().unwrap();
        assert_eq!(cfg.input, PathBuf::from("readings.csv"));
        assert_eq!(cfg.db_url, DEFAULT_DB_URL);
        assert!(cfg.accounts.is_none());
        assert!(cfg.report.is_none());
        assert!(!cfg.in_memory);
    }

    #[test]
    fn blank_db_url_returns_err() {
        let cfg = UploadConfig::builder("readings.csv").db_url("  ").build();
        assert!(matches!(cfg, Err(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn blank_db_url_is_fine_in_memory() {
        let cfg = UploadConfig::builder("readings.csv")
            .db_url("")
            .in_memory(true)
            .accounts("accounts.csv")
            .build();
        assert!(cfg.is_ok());
    }

    #[test]
    fn in_memory_without_accounts_returns_err() {
        let cfg = UploadConfig::builder("readings.csv").in_memory(true).build();
        assert!(matches!(cfg, Err(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn report_over_input_returns_err() {
        let cfg = UploadConfig::builder("readings.csv").report("readings.csv").build();
        assert!(matches!(cfg, Err(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn cli_maps_onto_config() {
        let cli = Cli::try_parse_from([
            "meter_readings",
            "Meter_Reading.csv",
            "--db-url",
            "sqlite::memory:",
            "--accounts",
            "Test_Accounts.csv",
            "--report",
            "report.json",
        ])
        .unwrap();
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.input, PathBuf::from("Meter_Reading.csv"));
        assert_eq!(cfg.db_url, "sqlite::memory:");
        assert_eq!(cfg.accounts, Some(PathBuf::from("Test_Accounts.csv")));
        assert_eq!(cfg.report, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn cli_requires_input() {
        assert!(Cli::try_parse_from(["meter_readings"]).is_err());
    }
}
