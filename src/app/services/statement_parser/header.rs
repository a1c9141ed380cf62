//! Statement header extraction
//!
//! Finds the depot identifier and the statement date in a statement's free
//! text. Marker lines can sit anywhere in the document.

use crate::app::models::StatementHeader;
use crate::constants::{DATE_MARKER, DEPOT_MARKER};

impl StatementHeader {
    /// Scan every line for the depot and date markers
    ///
    /// The value of a marker line is the line without the marker, trimmed.
    /// All lines are scanned and the last occurrence of a marker wins. A line
    /// carrying the depot marker is not checked for the date marker.
    pub fn extract(lines: &[&str]) -> Self {
        let mut header = StatementHeader::default();

        for line in lines {
            let line = line.trim();

            if line.contains(DEPOT_MARKER) {
                header.depot_id = marker_value(line, DEPOT_MARKER);
            } else if line.contains(DATE_MARKER) {
                header.statement_date = marker_value(line, DATE_MARKER);
            }
        }

        header
    }
}

fn marker_value(line: &str, marker: &str) -> String {
    line.replace(marker, "").trim().to_string()
}
