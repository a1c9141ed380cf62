//! Markdown table layout parsing
//!
//! Tables start at a `| STK. / Nominale |` header row and end at the first
//! blank line. Renderers sometimes collapse adjacent rows onto one physical
//! line joined by `||`; such lines are split back into independent rows.

use std::borrow::Cow;
use tracing::{debug, trace};

use super::column_mapping::{ColumnMapping, split_cells};
use super::locale_number::parse_locale_decimal;
use super::parser::RowParser;
use super::stats::{ParseResult, RowError};
use crate::app::models::{FormatKind, HoldingRecord, StatementHeader};
use crate::constants::{
    CONCATENATED_ROW_SEPARATOR, CELL_DELIMITER, INLINE_ISIN_MARKER, LINE_BREAK_MARKUP,
    MIN_ROW_SEGMENTS, TABLE_HEADER_CELL, TABLE_HEADER_FRAGMENT, TABLE_SEPARATOR_PREFIX,
};

/// Row parser for the markdown table layout
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRowParser;

impl RowParser for TableRowParser {
    fn format(&self) -> FormatKind {
        FormatKind::Table
    }

    fn parse(&self, lines: &[&str], header: &StatementHeader) -> ParseResult {
        let mut result = ParseResult::default();
        let mut mapping = ColumnMapping::default();
        let mut in_table = false;

        for raw_line in lines {
            let line = raw_line.trim();

            if line.starts_with(TABLE_HEADER_FRAGMENT) {
                in_table = true;
                mapping = ColumnMapping::analyze(line);
                debug!("Table header found, column mapping: {:?}", mapping);
                continue;
            }

            if in_table && is_data_row(line) {
                for row in split_concatenated_rows(line) {
                    match decode_row(&row, &mapping, header) {
                        Ok(record) => result.push_record(record),
                        Err(e) => {
                            debug!("Skipping table row '{}': {}", row, e);
                            result.push_skip(&row, &e);
                        }
                    }
                }
            }

            if line.is_empty() && in_table {
                in_table = false;
            }
        }

        result
    }
}

/// Check whether a trimmed line inside the table carries data
fn is_data_row(line: &str) -> bool {
    line.starts_with(CELL_DELIMITER)
        && !line.starts_with(TABLE_SEPARATOR_PREFIX)
        && !line.contains(TABLE_HEADER_CELL)
}

/// Split a physical line into the rows it encodes
pub fn split_concatenated_rows(line: &str) -> Vec<Cow<'_, str>> {
    if !line.contains(CONCATENATED_ROW_SEPARATOR) {
        return vec![Cow::Borrowed(line)];
    }

    line.split(CONCATENATED_ROW_SEPARATOR)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            if fragment.starts_with(CELL_DELIMITER) {
                Cow::Borrowed(fragment)
            } else {
                Cow::Owned(format!("{}{}", CELL_DELIMITER, fragment))
            }
        })
        .collect()
}

/// Decode one table row into a holding record
pub fn decode_row(
    row: &str,
    mapping: &ColumnMapping,
    header: &StatementHeader,
) -> Result<HoldingRecord, RowError> {
    let cells = split_cells(row);

    if cells.len() < MIN_ROW_SEGMENTS {
        return Err(RowError::structural(format!(
            "expected at least {} segments, found {}",
            MIN_ROW_SEGMENTS,
            cells.len()
        )));
    }

    if cells.len() <= mapping.max_required_index() {
        return Err(RowError::structural(format!(
            "column {} required by the table header is missing ({} segments)",
            mapping.max_required_index(),
            cells.len()
        )));
    }

    let cell = |index: usize| cells.get(index).map(|value| value.trim()).unwrap_or("");

    let (asset_name, inline_isin) = split_security_name(cell(mapping.security));
    let isin = match (inline_isin, mapping.isin) {
        (Some(isin), _) => isin,
        (None, Some(index)) => cell(index).to_string(),
        (None, None) => String::new(),
    };

    if let Some(index) = mapping.price_date {
        // Read but not stored: records carry the statement date
        trace!("Row price date '{}' ignored", cell(index));
    }

    let quantity = parse_locale_decimal(cell(mapping.quantity))
        .map_err(|e| RowError::number_format("quantity", e))?;
    let unit_price = parse_locale_decimal(cell(mapping.unit_price))
        .map_err(|e| RowError::number_format("unit price", e))?;
    let total_value = parse_locale_decimal(cell(mapping.total_value))
        .map_err(|e| RowError::number_format("total value", e))?;

    let mut record = HoldingRecord::new(
        header.depot_id.as_str(),
        asset_name,
        isin,
        quantity,
        unit_price,
        total_value,
        header.statement_date.as_str(),
    );

    if let Some(index) = mapping.ticker {
        record = record.with_ticker(cell(index));
    }

    Ok(record)
}

/// Split a security cell into asset name and inline ISIN
///
/// `Tesla Inc.<br>ISIN: US88160R1014` yields `("Tesla Inc.", Some("US88160R1014"))`.
/// The ISIN is `Some("")` when the marker is followed by nothing.
pub fn split_security_name(cell: &str) -> (String, Option<String>) {
    let name = cell.replace(LINE_BREAK_MARKUP, " ").replace('\n', " ");
    let mut parts = name.split(INLINE_ISIN_MARKER);

    let asset_name = parts.next().unwrap_or("").trim().to_string();
    let isin = parts.next().map(|rest| {
        rest.split_whitespace()
            .next()
            .unwrap_or("")
            .to_string()
    });

    (asset_name, isin)
}
