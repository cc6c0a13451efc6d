//! Input contract for the external narrative-insight generator.
//!
//! The LLM call that turns review text into an executive narrative lives
//! outside this crate. What lives here is the context it consumes: the
//! selected quarter's reviews plus the previous quarter's for comparison,
//! capped so the payload stays prompt-sized. The CLI writes this out as a
//! JSON artifact for the downstream step.

use serde::Serialize;

use crate::analytics::aggregate::previous_period;
use crate::review::{Review, quarter_of};

/// Caps on how many snippets each period contributes.
pub const CURRENT_SNIPPET_LIMIT: usize = 50;
pub const PREVIOUS_SNIPPET_LIMIT: usize = 20;

/// The part of a review the narrative generator actually reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSnippet {
    pub rating: f64,
    pub text: String,
}

impl From<&Review> for ReviewSnippet {
    fn from(review: &Review) -> Self {
        ReviewSnippet {
            rating: review.rating,
            text: review.text.clone(),
        }
    }
}

/// Everything the narrative generator needs for one reporting period.
#[derive(Debug, Clone, Serialize)]
pub struct InsightContext {
    pub client_name: String,
    pub year: i32,
    pub quarter: u32,
    pub previous_year: i32,
    pub previous_quarter: u32,
    /// Target-quarter snippets, most recent first, at most
    /// [`CURRENT_SNIPPET_LIMIT`].
    pub current_reviews: Vec<ReviewSnippet>,
    /// Previous-quarter snippets, at most [`PREVIOUS_SNIPPET_LIMIT`].
    pub previous_reviews: Vec<ReviewSnippet>,
}

/// Assembles the narrative context for a (client, year, quarter) selection.
pub fn build_insight_context(
    reviews: &[Review],
    client_name: &str,
    year: i32,
    quarter: u32,
) -> InsightContext {
    let (previous_year, previous_quarter) = previous_period(year, quarter);

    InsightContext {
        client_name: client_name.to_string(),
        year,
        quarter,
        previous_year,
        previous_quarter,
        current_reviews: period_snippets(reviews, year, quarter, CURRENT_SNIPPET_LIMIT),
        previous_reviews: period_snippets(
            reviews,
            previous_year,
            previous_quarter,
            PREVIOUS_SNIPPET_LIMIT,
        ),
    }
}

fn period_snippets(reviews: &[Review], year: i32, quarter: u32, limit: usize) -> Vec<ReviewSnippet> {
    let mut matching: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.year() == year && quarter_of(r.date) == quarter)
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching.iter().take(limit).map(|r| (*r).into()).collect()
}
