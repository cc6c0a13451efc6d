//! Free-form date normalization.
//!
//! Review exports carry dates in whatever shape the source platform produced:
//! ISO timestamps, verbose US forms, slashed numerics, or relative phrases
//! like "2 weeks ago". Strategies run in a fixed order and the first success
//! wins; a string no strategy accepts means the row is dropped by the caller.
//! Ambiguous `03/04/2024`-style inputs resolve month-first (US convention)
//! whenever the first number can be a month. That bias is deliberate and kept
//! stable so repeat uploads of the same file bucket identically.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime};

/// Plain date formats tried during absolute parsing, in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Datetime formats; the time portion is parsed and discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Normalizes a raw date cell to a calendar date, relative to `today`.
///
/// `today` is injected rather than read from the clock so relative phrases
/// are testable against a pinned date.
pub fn normalize_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let cleaned: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let lower = cleaned.to_lowercase();
    if lower == "today" {
        return Some(today);
    }
    if lower == "yesterday" {
        return today.pred_opt();
    }
    if lower.contains("ago") {
        return relative_ago(&lower, today);
    }

    parse_absolute(cleaned).or_else(|| numeric_fallback(cleaned))
}

/// Resolves `<n> <unit> ago` phrases. Matching is substring-based and the
/// count defaults to 1, so "a month ago" works. A phrase with no recognized
/// unit resolves to `today`, mirroring the platform exports this grew up on.
fn relative_ago(lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    let n = first_number(lower).unwrap_or(1);

    if lower.contains("day") {
        today.checked_sub_days(Days::new(n))
    } else if lower.contains("week") {
        today.checked_sub_days(Days::new(n * 7))
    } else if lower.contains("month") {
        today.checked_sub_months(Months::new(u32::try_from(n).ok()?))
    } else if lower.contains("year") {
        today.checked_sub_months(Months::new(u32::try_from(n * 12).ok()?))
    } else {
        Some(today)
    }
}

fn first_number(s: &str) -> Option<u64> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn parse_absolute(cleaned: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(datetime.date_naive());
    }
    None
}

/// Last-resort parse over the digit runs in the string.
///
/// With three or more numeric groups: a 4-digit leading group reads as
/// `YYYY-M-D`; otherwise month-first `M/D/YYYY` is preferred whenever the
/// first group can be a month, with `D/M/YYYY` as the fallback. Calendar
/// validation happens here too, so `2024-13-40` fails instead of wrapping.
fn numeric_fallback(cleaned: &str) -> Option<NaiveDate> {
    let groups: Vec<&str> = cleaned
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    if groups.len() < 3 {
        return None;
    }

    let n1: u32 = groups[0].parse().ok()?;
    let n2: u32 = groups[1].parse().ok()?;
    let n3: u32 = groups[2].parse().ok()?;

    if groups[0].len() == 4 {
        NaiveDate::from_ymd_opt(n1 as i32, n2, n3)
    } else if n1 <= 12 && groups[2].len() == 4 {
        NaiveDate::from_ymd_opt(n3 as i32, n1, n2)
    } else if n2 <= 12 && groups[2].len() == 4 {
        NaiveDate::from_ymd_opt(n3 as i32, n2, n1)
    } else {
        None
    }
}
