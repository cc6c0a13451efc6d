//! Bounded ranked selection with fallback pools.
//!
//! Both "top 3 representative reviews, backfilled from the wider year" and
//! "the 5 most recent years with data" are the same shape: rank a pool,
//! take up to a limit, and only then move on to the next pool. Implemented
//! once here so the selection order is testable on its own.

use std::cmp::Reverse;

/// Takes up to `limit` items, draining `pools` in order. Each pool is sorted
/// descending by `rank` before selection, so the best of an earlier pool
/// always beats the best of a later one.
pub fn ranked_take<T, K, F>(pools: Vec<Vec<T>>, limit: usize, rank: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut picked = Vec::with_capacity(limit);

    for mut pool in pools {
        if picked.len() >= limit {
            break;
        }
        pool.sort_by_key(|item| Reverse(rank(item)));
        for item in pool {
            if picked.len() >= limit {
                break;
            }
            picked.push(item);
        }
    }

    picked
}
