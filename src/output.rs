//! Output formatting and persistence for analytics results.
//!
//! Supports pretty JSON artifacts for downstream consumers and a flat CSV
//! history log that accumulates one row per analysis run.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{debug, info};

use crate::analytics::types::AnalyticsResult;

/// Flat, CSV-friendly snapshot of one analysis run.
#[derive(Debug, Serialize)]
pub struct HistoryRecord {
    pub generated_at: DateTime<Utc>,
    pub client_name: String,
    pub year: i32,
    pub quarter: u32,
    pub all_time_total: usize,
    pub ytd_total: usize,
    pub ytd_average: f64,
    pub quarter_total: usize,
    pub quarter_average: f64,
    pub reviews_to_improve: u64,
}

impl From<&AnalyticsResult> for HistoryRecord {
    fn from(result: &AnalyticsResult) -> Self {
        HistoryRecord {
            generated_at: result.generated_at,
            client_name: result.client_name.clone(),
            year: result.year,
            quarter: result.quarter,
            all_time_total: result.metrics.all_time_total,
            ytd_total: result.metrics.ytd_total,
            ytd_average: result.metrics.ytd_average,
            quarter_total: result.metrics.quarter_total,
            quarter_average: result.metrics.quarter_average,
            reviews_to_improve: result.metrics.reviews_to_improve,
        }
    }
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty JSON to `path`, overwriting any previous run.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    debug!(path, "JSON artifact written");
    Ok(())
}

/// Appends a [`HistoryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_history(path: &str, record: &HistoryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending history record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> HistoryRecord {
        HistoryRecord {
            generated_at: Utc::now(),
            client_name: "Acme".to_string(),
            year: 2024,
            quarter: 1,
            all_time_total: 120,
            ytd_total: 40,
            ytd_average: 4.4,
            quarter_total: 12,
            quarter_average: 4.6,
            reviews_to_improve: 9,
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_record()).unwrap();
    }

    #[test]
    fn test_write_json_creates_file() {
        let path = temp_path("review_pulse_test_write.json");
        let _ = fs::remove_file(&path); // clean up any prior run

        write_json(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"client_name\": \"Acme\""));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_history_creates_file() {
        let path = temp_path("review_pulse_test_create.csv");
        let _ = fs::remove_file(&path);

        append_history(&path, &sample_record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_history_writes_header_once() {
        let path = temp_path("review_pulse_test_header.csv");
        let _ = fs::remove_file(&path);

        append_history(&path, &sample_record()).unwrap();
        append_history(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content
            .lines()
            .filter(|l| l.contains("generated_at"))
            .count();
        assert_eq!(header_count, 1);

        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3); // 1 header + 2 data rows

        fs::remove_file(&path).unwrap();
    }
}
