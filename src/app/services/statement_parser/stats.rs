//! Parsing statistics, row errors and result structures
//!
//! Row-level failures never abort a statement. They are recorded here as a
//! skip counter plus a human-readable diagnostic per skipped row.

use crate::app::models::{FormatKind, HoldingRecord, StatementHeader};
use super::locale_number::NumberFormatError;

/// Why a single row or position block was dropped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A numeric field could not be decoded
    #[error("invalid {field}: {source}")]
    NumberFormat {
        field: &'static str,
        #[source]
        source: NumberFormatError,
    },

    /// Too few columns, or a position block cut off by the end of input
    #[error("structural mismatch: {reason}")]
    StructuralMismatch { reason: String },
}

impl RowError {
    /// Create a number format error for a named field
    pub fn number_format(field: &'static str, source: NumberFormatError) -> Self {
        Self::NumberFormat { field, source }
    }

    /// Create a structural mismatch error
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            reason: reason.into(),
        }
    }
}

/// Row parser output: records plus statistics
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Successfully decoded holding records, in statement order
    pub records: Vec<HoldingRecord>,

    /// Row counters and diagnostics
    pub stats: ParseStats,
}

impl ParseResult {
    /// Record a decoded row
    pub fn push_record(&mut self, record: HoldingRecord) {
        self.stats.total_rows += 1;
        self.stats.records_parsed += 1;
        self.records.push(record);
    }

    /// Record a dropped row
    pub fn push_skip(&mut self, row: &str, error: &RowError) {
        self.stats.total_rows += 1;
        self.stats.rows_skipped += 1;
        self.stats
            .errors
            .push(format!("Row {} ({}): {}", self.stats.total_rows, row, error));
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Number of data rows or position blocks encountered
    pub total_rows: usize,

    /// Number of holding records successfully decoded
    pub records_parsed: usize,

    /// Number of rows dropped for structural or numeric failures
    pub rows_skipped: usize,

    /// One diagnostic per skipped row
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            records_parsed: 0,
            rows_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check whether every encountered row was decoded
    pub fn is_clean(&self) -> bool {
        self.rows_skipped == 0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Full result of parsing one statement
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Header found in the statement
    pub header: StatementHeader,

    /// Layout the statement was parsed as
    pub format: FormatKind,

    /// Decoded holding records
    pub records: Vec<HoldingRecord>,

    /// Row counters and diagnostics
    pub stats: ParseStats,
}

impl ParseOutcome {
    /// Number of decoded records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of rows dropped while parsing
    pub fn skipped_row_count(&self) -> usize {
        self.stats.rows_skipped
    }
}
