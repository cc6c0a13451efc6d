//! Aggregates a review set into the metrics for one reporting period.

use std::collections::HashMap;

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::debug;

use crate::analytics::improve::reviews_to_improve;
use crate::analytics::ranked::ranked_take;
use crate::analytics::types::{
    AnalyticsResult, QuarterBucket, ReviewMetrics, StarBucket, YearBucket,
};
use crate::analytics::utility::{mean, round2};
use crate::review::Review;

/// Bumped when the serialized shape of [`AnalyticsResult`] changes.
pub const SCHEMA_VERSION: u8 = 1;

/// The yearly trend keeps the 5 most recent years that have any data.
const YEARLY_TREND_LIMIT: usize = 5;

/// Representative-review selection: up to 3 five-star reviews with enough
/// text to be worth quoting.
const TOP_REVIEW_LIMIT: usize = 3;
const TOP_REVIEW_MIN_TEXT: usize = 20;

/// Reporting period immediately before (year, quarter): Q1 wraps to Q4 of
/// the prior year.
pub fn previous_period(year: i32, quarter: u32) -> (i32, u32) {
    if quarter == 1 {
        (year - 1, 4)
    } else {
        (year, quarter - 1)
    }
}

/// Computes the full [`AnalyticsResult`] for one (client, year, quarter)
/// selection. A missing year or quarter defaults to the period of the most
/// recent review.
///
/// # Errors
///
/// Fails when `reviews` is empty; there is no meaningful empty-state result
/// to render downstream.
pub fn aggregate(
    reviews: &[Review],
    client_name: &str,
    target_year: Option<i32>,
    target_quarter: Option<u32>,
) -> Result<AnalyticsResult> {
    if reviews.is_empty() {
        bail!("No valid reviews found.");
    }

    let mut sorted: Vec<&Review> = reviews.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let latest = sorted[0];
    let year = target_year.unwrap_or_else(|| latest.year());
    let quarter = target_quarter.unwrap_or_else(|| latest.quarter());

    let ytd: Vec<&Review> = sorted
        .iter()
        .copied()
        .filter(|r| r.year() == year)
        .collect();
    let in_quarter: Vec<&Review> = ytd
        .iter()
        .copied()
        .filter(|r| r.quarter() == quarter)
        .collect();

    let ytd_ratings: Vec<f64> = ytd.iter().map(|r| r.rating).collect();
    let quarter_ratings: Vec<f64> = in_quarter.iter().map(|r| r.rating).collect();
    let ytd_average = round2(mean(&ytd_ratings));

    let metrics = ReviewMetrics {
        all_time_total: sorted.len(),
        ytd_total: ytd.len(),
        ytd_average,
        quarter_total: in_quarter.len(),
        quarter_average: round2(mean(&quarter_ratings)),
        reviews_to_improve: reviews_to_improve(ytd_average, ytd.len()),
    };

    debug!(
        year,
        quarter,
        ytd_total = metrics.ytd_total,
        quarter_total = metrics.quarter_total,
        "Aggregated review set"
    );

    Ok(AnalyticsResult {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        client_name: client_name.to_string(),
        year,
        quarter,
        metrics,
        distribution: distribution(&ytd),
        quarterly_trend: quarterly_trend(&ytd, year),
        yearly_trend: yearly_trend(&sorted),
        top_reviews: top_reviews(&in_quarter, &ytd, quarter),
    })
}

/// Star distribution over the YTD set. Ratings round to the nearest whole
/// star; anything outside 1–5 is left out of the distribution (it still
/// counts in the totals and averages).
fn distribution(ytd: &[&Review]) -> Vec<StarBucket> {
    let mut counts = [0usize; 5];
    for review in ytd {
        let star = review.rating.round();
        if (1.0..=5.0).contains(&star) {
            counts[star as usize - 1] += 1;
        }
    }
    (1..=5u32)
        .map(|stars| StarBucket::new(stars, counts[stars as usize - 1]))
        .collect()
}

/// Always exactly four buckets, Q1–Q4, zero-filled where a quarter is empty.
fn quarterly_trend(ytd: &[&Review], year: i32) -> Vec<QuarterBucket> {
    (1..=4u32)
        .map(|quarter| {
            let ratings: Vec<f64> = ytd
                .iter()
                .filter(|r| r.quarter() == quarter)
                .map(|r| r.rating)
                .collect();
            QuarterBucket {
                year,
                quarter,
                review_count: ratings.len(),
                average_rating: round2(mean(&ratings)),
            }
        })
        .collect()
}

/// Groups all reviews (not just YTD) by year and keeps the most recent
/// [`YEARLY_TREND_LIMIT`] years, ascending.
fn yearly_trend(sorted: &[&Review]) -> Vec<YearBucket> {
    let mut by_year: HashMap<i32, Vec<f64>> = HashMap::new();
    for review in sorted {
        by_year.entry(review.year()).or_default().push(review.rating);
    }

    let buckets: Vec<YearBucket> = by_year
        .into_iter()
        .map(|(year, ratings)| YearBucket {
            year,
            review_count: ratings.len(),
            average_rating: round2(mean(&ratings)),
        })
        .collect();

    let mut trend = ranked_take(vec![buckets], YEARLY_TREND_LIMIT, |b| b.year);
    trend.sort_by_key(|b| b.year);
    trend
}

/// Up to three quotable 5-star reviews from the target quarter, longest text
/// first, backfilled from the rest of the year when the quarter runs short.
fn top_reviews(in_quarter: &[&Review], ytd: &[&Review], quarter: u32) -> Vec<Review> {
    let primary: Vec<Review> = in_quarter
        .iter()
        .filter(|r| is_quotable(r))
        .map(|r| (*r).clone())
        .collect();
    let backfill: Vec<Review> = ytd
        .iter()
        .filter(|r| r.quarter() != quarter && is_quotable(r))
        .map(|r| (*r).clone())
        .collect();

    ranked_take(vec![primary, backfill], TOP_REVIEW_LIMIT, |r| {
        r.text.chars().count()
    })
}

fn is_quotable(review: &Review) -> bool {
    // Exactly 5 stars, not 4.9-and-up: these get quoted verbatim.
    review.rating == 5.0 && review.text.chars().count() > TOP_REVIEW_MIN_TEXT
}
