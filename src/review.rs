use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Reviewer name used when the export has no reviewer column or an empty cell.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// A single customer review parsed out of an uploaded export.
///
/// A `Review` only exists with a valid parsed calendar date; rows whose date
/// cannot be normalized are dropped during parsing rather than stored with a
/// sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// Original date cell, kept for display only. All bucketing uses `date`.
    pub raw_date: String,
    pub date: NaiveDate,
    /// Not bounds-checked at parse time; the aggregator decides what to do
    /// with out-of-range values.
    pub rating: f64,
    pub text: String,
    pub reviewer: String,
}

impl Review {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar quarter of the review, 1–4 (Q1 = Jan–Mar).
    pub fn quarter(&self) -> u32 {
        quarter_of(self.date)
    }
}

/// Calendar quarter for a date, 1–4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}
