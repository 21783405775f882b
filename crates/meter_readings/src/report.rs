// Rust guideline compliant 2026-10-18

//! Rendering of a [`BatchResult`] for the terminal and as a JSON file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;
use domain::BatchResult;

/// Write one `FAILURE:` line per rejected entry followed by the summary line.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn render<W: Write>(result: &BatchResult, skipped_rows: usize, out: &mut W) -> io::Result<()> {
    for error in &result.errors {
        writeln!(
            out,
            "FAILURE: {}. ERRORS: {}",
            error.entry,
            error.validation_errors.join("|")
        )?;
    }
    writeln!(
        out,
        "\nFinished processing meter readings. SuccessCount: {}, FailureCount: {}.",
        result.success_count,
        result.failure_count()
    )?;
    if skipped_rows > 0 {
        writeln!(out, "Skipped {skipped_rows} unreadable row(s); see the log for details.")?;
    }
    Ok(())
}

/// Write `result` as pretty-printed JSON to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_json(result: &BatchResult, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result).context("failed to serialize report")?;
    writer.flush().context("failed to flush report")?;
    tracing::info!(path = %path.display(), "report.written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::{BatchError, Entry};

    fn sample() -> BatchResult {
        let when = NaiveDate::from_ymd_opt(2019, 4, 22)
            .unwrap()
            .and_hms_opt(9, 24, 0)
            .unwrap();
        BatchResult {
            success_count: 2,
            errors: vec![BatchError {
                entry: Entry::new(2344, when, "VOID"),
                validation_errors: vec![
                    "Property: AccountId, Message: AccountId does not exist".to_owned(),
                    "Property: MeterReadValue, Message: MeterReadValue must be in the format NNNNN"
                        .to_owned(),
                ],
            }],
        }
    }

    #[test]
    fn renders_failures_and_summary() {
        let mut out = Vec::new();
        render(&sample(), 0, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "FAILURE: AccountId = 2344, MeterReadingDateTime = 2019-04-22 09:24:00, MeterReadValue = VOID. \
             ERRORS: Property: AccountId, Message: AccountId does not exist|\
             Property: MeterReadValue, Message: MeterReadValue must be in the format NNNNN\n\
             \nFinished processing meter readings. SuccessCount: 2, FailureCount: 1.\n"
        );
    }

    #[test]
    fn mentions_skipped_rows() {
        let mut out = Vec::new();
        render(&BatchResult::default(), 3, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Skipped 3 unreadable row(s); see the log for details.\n"));
    }

    #[test]
    fn json_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let result = sample();
        write_json(&result, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"successCount\": 2"));
        assert!(text.contains("\"validationErrors\""));
        let back: BatchResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back, result);
    }
}
