//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::review::Review;

/// One calendar quarter of a year, as shown in the quarterly trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterBucket {
    pub year: i32,
    /// 1–4.
    pub quarter: u32,
    pub review_count: usize,
    /// Mean rating rounded to 2 decimals; 0 when the quarter has no reviews.
    pub average_rating: f64,
}

/// One calendar year in the yearly trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub review_count: usize,
    pub average_rating: f64,
}

/// One slice of the 1–5 star distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarBucket {
    pub stars: u32,
    /// Chart-facing label, e.g. "5 Stars".
    pub label: String,
    pub count: usize,
}

impl StarBucket {
    pub fn new(stars: u32, count: usize) -> Self {
        let label = if stars == 1 {
            "1 Star".to_string()
        } else {
            format!("{stars} Stars")
        };
        StarBucket {
            stars,
            label,
            count,
        }
    }
}

/// Headline counters and averages for the selected period.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewMetrics {
    pub all_time_total: usize,
    pub ytd_total: usize,
    pub ytd_average: f64,
    pub quarter_total: usize,
    pub quarter_average: f64,
    /// Additional 5-star reviews needed to lift the YTD average by 0.1.
    pub reviews_to_improve: u64,
}

/// Complete aggregation result for one (file, client, year, quarter)
/// selection, written as JSON for the charting and report layers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResult {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub client_name: String,
    pub year: i32,
    pub quarter: u32,
    pub metrics: ReviewMetrics,
    /// Star distribution over the YTD set, always 5 entries (1–5 stars).
    pub distribution: Vec<StarBucket>,
    /// Always exactly 4 entries, Q1–Q4 of the selected year.
    pub quarterly_trend: Vec<QuarterBucket>,
    /// At most the 5 most recent years with data, ascending.
    pub yearly_trend: Vec<YearBucket>,
    /// Up to 3 representative 5-star reviews for the quarter.
    pub top_reviews: Vec<Review>,
}
