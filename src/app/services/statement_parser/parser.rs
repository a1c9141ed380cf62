//! Statement parsing orchestration
//!
//! This module splits a statement into lines, extracts the header, detects
//! the layout and hands the lines to the row parser registered for it.

use tracing::{debug, info};

use super::format_detector::detect_format;
use super::line_parser::LineOrientedParser;
use super::stats::{ParseOutcome, ParseResult};
use super::table_parser::TableRowParser;
use crate::app::models::{FormatKind, StatementHeader};

/// Capability shared by the per-layout row parsers
///
/// Row parsers never fail as a whole: rows that cannot be decoded are
/// counted in the returned statistics and parsing continues.
pub trait RowParser: Send + Sync {
    /// Layout this parser understands
    fn format(&self) -> FormatKind;

    /// Turn statement lines into holding records for the given header
    fn parse(&self, lines: &[&str], header: &StatementHeader) -> ParseResult;
}

impl FormatKind {
    /// Row parser responsible for this layout
    pub fn row_parser(self) -> &'static dyn RowParser {
        match self {
            FormatKind::Table => &TableRowParser,
            FormatKind::LineOriented => &LineOrientedParser,
        }
    }
}

/// Parse a complete statement
pub fn parse_statement(text: &str) -> ParseOutcome {
    let lines: Vec<&str> = text.lines().collect();

    let header = StatementHeader::extract(&lines);
    debug!(
        "Parsed header: depot='{}', date='{}'",
        header.depot_id, header.statement_date
    );

    let format = detect_format(&lines);
    debug!("Detected statement format: {}", format);

    let ParseResult { records, stats } = format.row_parser().parse(&lines, &header);

    info!(
        "Parsed {} records from {} rows ({} skipped) for depot '{}'",
        stats.records_parsed, stats.total_rows, stats.rows_skipped, header.depot_id
    );

    ParseOutcome {
        header,
        format,
        records,
        stats,
    }
}
