//! Tolerant CSV-to-record parsing for loosely structured review exports.
//!
//! The pipeline runs strictly downward: delimiter detection over a text
//! sample, a quote-aware row tokenizer, header/column resolution by keyword,
//! date normalization, and finally record building. Malformed rows are
//! dropped; structural problems (no rows, no usable columns) are fatal.

pub mod columns;
pub mod date;
pub mod delimiter;
pub mod records;
pub mod tokenizer;

/// Strips a single wrapping double-quote from either end of a cell.
///
/// Tokenized fields occasionally keep a stray quote when the source file mixes
/// quoting styles; header matching and display values both want it gone.
pub(crate) fn strip_wrapping_quotes(cell: &str) -> &str {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    cell.strip_suffix('"').unwrap_or(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"Rating\""), "Rating");
        assert_eq!(strip_wrapping_quotes("\"Rating"), "Rating");
        assert_eq!(strip_wrapping_quotes("Rating\""), "Rating");
        assert_eq!(strip_wrapping_quotes("Rating"), "Rating");
        // Only the outermost pair goes; interior quotes are data.
        assert_eq!(strip_wrapping_quotes("\"a \"\"b\"\" c\""), "a \"\"b\"\" c");
    }
}
