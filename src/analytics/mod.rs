//! Temporal aggregation of parsed reviews.
//!
//! This module buckets reviews into calendar quarters and years, computes
//! rounded summary metrics for a selected reporting period, derives the
//! "reviews needed to improve" target, and assembles the context handed to
//! the downstream narrative generator.

pub mod aggregate;
pub mod improve;
pub mod insight;
pub mod ranked;
pub mod types;
pub mod utility;
