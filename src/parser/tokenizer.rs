//! Quote-aware CSV row tokenizer.
//!
//! A single left-to-right scan turns raw text into rows of trimmed fields.
//! Quoting follows the common spreadsheet conventions: a `"` toggles quoted
//! mode, `""` inside a quoted span is one literal quote, and delimiters or
//! line breaks inside quotes are field data. Blank lines are discarded; a
//! missing final newline still flushes the last row.

/// Scanner state. `RowBreak` is the pending-row-flush state entered after a
/// bare `\r`, so that a following `\n` is consumed as part of one terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InQuotes,
    RowBreak,
}

struct RowScanner {
    delimiter: char,
    state: ScanState,
    field: String,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RowScanner {
    fn new(delimiter: char) -> Self {
        RowScanner {
            delimiter,
            state: ScanState::Normal,
            field: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Feeds one character through the state machine. Returns `true` when the
    /// lookahead character was consumed as well (the `""` escape).
    fn advance(&mut self, ch: char, lookahead: Option<char>) -> bool {
        if self.state == ScanState::RowBreak {
            self.state = ScanState::Normal;
            if ch == '\n' {
                // Second half of a CRLF terminator; the row is already closed.
                return false;
            }
        }

        match self.state {
            ScanState::InQuotes => match ch {
                '"' if lookahead == Some('"') => {
                    self.field.push('"');
                    return true;
                }
                '"' => self.state = ScanState::Normal,
                _ => self.field.push(ch),
            },
            ScanState::Normal => match ch {
                '"' => self.state = ScanState::InQuotes,
                _ if ch == self.delimiter => self.end_field(),
                '\n' => self.end_row(),
                '\r' => {
                    self.end_row();
                    self.state = ScanState::RowBreak;
                }
                _ => self.field.push(ch),
            },
            ScanState::RowBreak => unreachable!("RowBreak is cleared before dispatch"),
        }

        false
    }

    fn end_field(&mut self) {
        self.row.push(self.field.trim().to_string());
        self.field.clear();
    }

    /// Closes the current row, dropping it when it is a single empty field
    /// (a blank line).
    fn end_row(&mut self) {
        self.end_field();
        let row = std::mem::take(&mut self.row);
        if row.len() > 1 || row.first().is_some_and(|f| !f.is_empty()) {
            self.rows.push(row);
        }
    }

    /// End-of-input flush. Unlike `end_row` this keeps whatever is pending,
    /// so a final line without a terminator is not lost.
    fn finish(mut self) -> Vec<Vec<String>> {
        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_field();
            self.rows.push(std::mem::take(&mut self.row));
        }
        self.rows
    }
}

/// Tokenizes `text` into rows of fields using `delimiter`.
///
/// Never fails; structural judgments (e.g. "no rows at all") belong to the
/// caller.
pub fn tokenize(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut scanner = RowScanner::new(delimiter);
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if scanner.advance(ch, chars.peek().copied()) {
            chars.next();
        }
    }

    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<String>> {
        tokenize(text, ',')
    }

    #[test]
    fn test_round_trip_quoted_field() {
        let parsed = rows("a,\"b,c\",d\n1,2,3");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], vec!["a", "b,c", "d"]);
        assert_eq!(parsed[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_escaped_quote_collapses() {
        let parsed = rows("name,comment\nBob,\"said \"\"wow\"\" twice\"\n");
        assert_eq!(parsed[1][1], "said \"wow\" twice");
    }

    #[test]
    fn test_embedded_newline_stays_in_field() {
        let parsed = rows("note,score\n\"line one\nline two\",5\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1][0], "line one\nline two");
        assert_eq!(parsed[1][1], "5");
    }

    #[test]
    fn test_crlf_is_one_terminator() {
        let parsed = rows("a,b\r\n1,2\r\n");
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_bare_cr_is_a_terminator() {
        let parsed = rows("a,b\r1,2");
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let parsed = rows("a,b\n\n\n1,2\n");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_row_with_empty_fields_is_kept() {
        // Two empty fields is still a row; only the single-empty-field row
        // counts as blank.
        let parsed = rows(",\n");
        assert_eq!(parsed, vec![vec!["", ""]]);
    }

    #[test]
    fn test_missing_trailing_newline_flushes() {
        let parsed = rows("a,b\n1,2");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], vec!["1", "2"]);
    }

    #[test]
    fn test_unterminated_quote_flushes_at_eof() {
        let parsed = rows("a,\"unclosed value");
        assert_eq!(parsed, vec![vec!["a", "unclosed value"]]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let parsed = rows("  a  ,  b  \n");
        assert_eq!(parsed, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let parsed = tokenize("a;b\n1;2\n", ';');
        assert_eq!(parsed, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        // Column-count enforcement happens later, at record building.
        let parsed = rows("a,b,c\n1,2\n");
        assert_eq!(parsed[0].len(), 3);
        assert_eq!(parsed[1].len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(rows("").is_empty());
        assert!(rows("\n\n").is_empty());
    }
}
