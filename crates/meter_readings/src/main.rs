// Rust guideline compliant 2026-10-18

//! Meter-readings upload entry point.
//!
//! Reads a CSV batch of meter readings, validates and stores it through the
//! batch processor, prints one line per rejected reading plus a summary, and
//! optionally writes the JSON report.
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=info cargo run -- Meter_Reading.csv --accounts Test_Accounts.csv
//!
//! # Dry run against an in-memory store, keeping the JSON report
//! cargo run -- Meter_Reading.csv --accounts Test_Accounts.csv --in-memory --report report.json
//! ```

mod adapters;
mod config;
mod input;
mod pipeline;
mod report;

use adapters::in_memory_store::InMemoryStore;
use adapters::sqlite_store::SqliteStore;
use anyhow::Context as _;
use clap::Parser as _;
use config::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Cli::parse().into_config().context("invalid arguments")?;

    let accounts = match &config.accounts {
        Some(path) => input::read_accounts(path).context("failed to read accounts file")?,
        None => vec![],
    };
    let batch = input::read_readings(&config.input).context("failed to read meter readings")?;
    for row in &batch.skipped {
        tracing::warn!(line = row.line, reason = %row.reason, "input.row.skipped");
    }
    tracing::info!(
        path = %config.input.display(),
        entries = batch.entries.len(),
        skipped = batch.skipped.len(),
        "main.input.loaded"
    );

    let result = if config.in_memory {
        let store = InMemoryStore::new();
        store.add_accounts(&accounts);
        pipeline::run_batch(&store, &batch.entries).await
    } else {
        let store = SqliteStore::new(&config.db_url)
            .await
            .context("failed to open SQLite store")?;
        store
            .add_accounts(&accounts)
            .await
            .context("failed to seed accounts")?;
        pipeline::run_batch(&store, &batch.entries).await
    };

    report::render(&result, batch.skipped.len(), &mut std::io::stdout().lock())
        .context("failed to print report")?;
    if let Some(path) = &config.report {
        report::write_json(&result, path)?;
    }

    Ok(())
}
