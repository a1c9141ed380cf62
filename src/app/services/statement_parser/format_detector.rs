//! Statement layout detection

use crate::app::models::FormatKind;
use crate::constants::TABLE_HEADER_FRAGMENT;

/// Classify a statement by looking for the table column header anywhere
pub fn detect_format(lines: &[&str]) -> FormatKind {
    if lines.iter().any(|line| line.contains(TABLE_HEADER_FRAGMENT)) {
        FormatKind::Table
    } else {
        FormatKind::LineOriented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header_anywhere() {
        let lines = [
            "Vermögensaufstellung",
            "",
            "Some prose | STK. / Nominale | trailing",
        ];
        assert_eq!(detect_format(&lines), FormatKind::Table);
    }

    #[test]
    fn test_fragment_must_match_exactly() {
        let lines = ["|STK. / Nominale|", "| Stk. / Nominale |", "10,00 Stk. Stock A"];
        assert_eq!(detect_format(&lines), FormatKind::LineOriented);
    }

    #[test]
    fn test_empty_statement() {
        assert_eq!(detect_format(&[]), FormatKind::LineOriented);
    }
}
