//! Review record building: the full text-to-records pipeline.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::parser::columns::{ColumnMap, resolve_columns};
use crate::parser::date::normalize_date;
use crate::parser::delimiter::{SAMPLE_LEN, describe, detect_delimiter};
use crate::parser::strip_wrapping_quotes;
use crate::parser::tokenizer::tokenize;
use crate::review::{ANONYMOUS_REVIEWER, Review};

/// Parses a raw review export into validated [`Review`] records, most recent
/// first.
///
/// The input is already-decoded UTF-8 text; a leading byte-order mark is
/// stripped. Malformed rows (too few cells, unparseable date) are skipped
/// silently; a messy export should still yield whatever it can.
///
/// # Errors
///
/// Fails when the file tokenizes to zero rows, or when no date/rating columns
/// can be resolved.
pub fn parse_reviews(text: &str) -> Result<Vec<Review>> {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text);

    let sample: String = content.chars().take(SAMPLE_LEN).collect();
    let delimiter = detect_delimiter(&sample);

    let rows = tokenize(content, delimiter);
    if rows.is_empty() {
        bail!("File appears to be empty.");
    }

    let columns = resolve_columns(&rows)?;
    debug!(
        delimiter = describe(delimiter),
        header_row = columns.header_row,
        rows = rows.len(),
        "Export tokenized"
    );

    let mut reviews = build_records(&rows, &columns, Utc::now().date_naive());
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(reviews)
}

/// Builds records from tokenized rows below the header. `today` anchors
/// relative dates and is injected so tests can pin it.
pub fn build_records(rows: &[Vec<String>], columns: &ColumnMap, today: NaiveDate) -> Vec<Review> {
    let required_len = columns.date.max(columns.rating);
    let mut reviews = Vec::new();

    for row in rows.iter().skip(columns.header_row + 1) {
        // Malformed-row tolerance: not an error, just not a record.
        if row.len() <= required_len {
            continue;
        }

        let raw_date = row[columns.date].as_str();
        let Some(date) = normalize_date(raw_date, today) else {
            continue;
        };

        let text = columns
            .text
            .and_then(|i| row.get(i))
            .map(|cell| strip_wrapping_quotes(cell).trim().to_string())
            .unwrap_or_default();

        let reviewer = match columns.reviewer.and_then(|i| row.get(i)) {
            Some(cell) if !cell.is_empty() => strip_wrapping_quotes(cell).trim().to_string(),
            _ => ANONYMOUS_REVIEWER.to_string(),
        };

        reviews.push(Review {
            raw_date: strip_wrapping_quotes(raw_date).trim().to_string(),
            date,
            rating: clean_rating(&row[columns.rating]),
            text,
            reviewer,
        });
    }

    reviews
}

/// Strips unit noise from a rating cell ("4.5 stars" -> 4.5). A cell that
/// still fails to parse counts as 0 rather than losing the row.
fn clean_rating(raw: &str) -> f64 {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().unwrap_or(0.0)
}
