//! Header location and semantic column resolution.
//!
//! Exports rarely agree on column names, so both steps run on keyword
//! heuristics. The keyword sets below are ordered rules: resolution is always
//! first match wins, header cell order first, so the outcome is deterministic
//! for a given file.

use anyhow::{Result, bail};

use crate::parser::strip_wrapping_quotes;

/// How many leading rows are searched for a plausible header.
pub const HEADER_SCAN_LIMIT: usize = 10;

/// Hints that make a row *look like* a header during the scan. `value` is a
/// header hint only; it is deliberately absent from the rating column
/// keywords below.
const HEADER_DATE_HINTS: &[&str] = &["date", "time", "published", "period", "timestamp"];
const HEADER_RATING_HINTS: &[&str] = &["rating", "star", "score", "grade", "value"];

const DATE_KEYWORDS: &[&str] = &[
    "date",
    "time",
    "published",
    "created",
    "posted",
    "timestamp",
    "period",
];
const RATING_KEYWORDS: &[&str] = &["rating", "star", "score", "grade"];
const TEXT_KEYWORDS: &[&str] = &[
    "text",
    "review",
    "content",
    "comment",
    "body",
    "message",
    "description",
    "feedback",
];
const REVIEWER_KEYWORDS: &[&str] = &[
    "name", "reviewer", "author", "user", "customer", "client", "person",
];

/// Resolved header position and semantic column indices for one export.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    /// Index of the header row within the token stream; data starts below it.
    pub header_row: usize,
    /// Normalized (lower-cased, unquoted) header cells, kept for diagnostics.
    pub headers: Vec<String>,
    pub date: usize,
    pub rating: usize,
    pub text: Option<usize>,
    pub reviewer: Option<usize>,
}

/// Locates the header row and maps the semantic columns.
///
/// Date and rating columns are mandatory; failing to find them is a schema
/// error and the message carries the headers that *were* found so the caller
/// can fix the source file.
pub fn resolve_columns(rows: &[Vec<String>]) -> Result<ColumnMap> {
    let (header_row, headers) = locate_header(rows);

    let date = find_column(&headers, DATE_KEYWORDS);
    let rating = find_column(&headers, RATING_KEYWORDS);
    let (Some(date), Some(rating)) = (date, rating) else {
        bail!(
            "Could not identify Date or Rating columns. Found headers: {}",
            headers.join(", ")
        );
    };

    Ok(ColumnMap {
        header_row,
        text: find_column(&headers, TEXT_KEYWORDS),
        reviewer: find_column(&headers, REVIEWER_KEYWORDS),
        headers,
        date,
        rating,
    })
}

/// Scans the first [`HEADER_SCAN_LIMIT`] rows for one that carries both a
/// date-like and a rating-like cell. Falls back to row 0 unconditionally so a
/// headerless file still gets a deterministic (if wrong) mapping attempt.
fn locate_header(rows: &[Vec<String>]) -> (usize, Vec<String>) {
    for (index, row) in rows.iter().take(HEADER_SCAN_LIMIT).enumerate() {
        let cells = normalize_cells(row);
        let has_date = cells.iter().any(|c| contains_any(c, HEADER_DATE_HINTS));
        let has_rating = cells.iter().any(|c| contains_any(c, HEADER_RATING_HINTS));
        if has_date && has_rating {
            return (index, cells);
        }
    }
    (0, normalize_cells(&rows[0]))
}

fn normalize_cells(row: &[String]) -> Vec<String> {
    row.iter()
        .map(|cell| strip_wrapping_quotes(&cell.to_lowercase()).to_string())
        .collect()
}

/// First header cell containing any of the keywords, if any.
fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers.iter().position(|h| contains_any(h, keywords))
}

fn contains_any(cell: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| cell.contains(k))
}
