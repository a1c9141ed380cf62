//! Statement parser for broker portfolio statements
//!
//! This module turns the plain text of a portfolio statement into holding
//! records. Two layouts are supported: a markdown table and an older
//! line-oriented layout. Rows that cannot be decoded are skipped and counted
//! rather than failing the whole statement.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - Parsing orchestration and the [`RowParser`] capability
//! - [`header`] - Depot identifier and statement date extraction
//! - [`format_detector`] - Table versus line-oriented layout detection
//! - [`column_mapping`] - Table header analysis
//! - [`table_parser`] - Markdown table rows, including collapsed `||` rows
//! - [`line_parser`] - State machine over line-oriented position blocks
//! - [`locale_number`] - `1.234,56` number decoding
//! - [`stats`] - Row errors, parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use depot_ingest::app::services::statement_parser::parse_statement;
//!
//! let outcome = parse_statement("**Depot:** 1234\n10,00 Stk. Stock A\nISIN: US1111111111\n100,00\n01.01.2024\n1000,00");
//!
//! assert_eq!(outcome.header.depot_id, "1234");
//! assert_eq!(outcome.record_count(), 1);
//! ```

pub mod column_mapping;
pub mod format_detector;
pub mod header;
pub mod line_parser;
pub mod locale_number;
pub mod parser;
pub mod stats;
pub mod table_parser;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::ColumnMapping;
pub use format_detector::detect_format;
pub use line_parser::{LineOrientedParser, LineState};
pub use locale_number::{NumberFormatError, parse_legacy_decimal, parse_locale_decimal};
pub use parser::{RowParser, parse_statement};
pub use stats::{ParseOutcome, ParseResult, ParseStats, RowError};
pub use table_parser::TableRowParser;
