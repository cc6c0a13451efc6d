//! The "reviews needed to improve" inverse calculation.

use crate::analytics::utility::round1;

/// Smallest number of additional 5-star reviews that lifts a year-to-date
/// average of `current_avg` over `total_reviews` reviews up to the next
/// 0.1 step.
///
/// The target is `current_avg + 0.1` rounded to one decimal. Solving
/// `(avg·n + 5k) / (n + k) >= target` for the smallest integer `k` gives
/// `k = ceil((target·n − avg·n) / (5 − target))`.
///
/// Returns 0 when no amount of 5-star reviews can help: the average is
/// already 5.0, the target would exceed 5, or the target *is* 5, where the
/// denominator hits zero (an average below 5 can only approach 5, never
/// reach it).
pub fn reviews_to_improve(current_avg: f64, total_reviews: usize) -> u64 {
    if current_avg >= 5.0 {
        return 0;
    }

    let target = round1(current_avg + 0.1);
    if target > 5.0 {
        return 0;
    }

    let denominator = 5.0 - target;
    if denominator <= 0.0 {
        return 0;
    }

    let n = total_reviews as f64;
    let needed = ((target * n - current_avg * n) / denominator).ceil();
    if needed > 0.0 { needed as u64 } else { 0 }
}
