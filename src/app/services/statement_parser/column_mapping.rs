//! Column mapping for the table layout
//!
//! This module analyzes the table header row to find which `|`-separated
//! segment carries which field. When the header does not name the required
//! columns the fixed positional layout is used.

use crate::constants::{CELL_DELIMITER, default_columns};

/// Field carried by a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Quantity,
    Security,
    Isin,
    Ticker,
    UnitPrice,
    PriceDate,
    TotalValue,
}

/// Column mapping for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Segment index of the quantity column
    pub quantity: usize,

    /// Segment index of the security name column
    pub security: usize,

    /// Segment index of the unit price column
    pub unit_price: usize,

    /// Segment index of the price date column, if any
    pub price_date: Option<usize>,

    /// Segment index of the total value column
    pub total_value: usize,

    /// Segment index of a dedicated ISIN column, if any
    pub isin: Option<usize>,

    /// Segment index of a ticker/symbol column, if any
    pub ticker: Option<usize>,

    /// Whether the indices come from the header row
    pub from_header: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            quantity: default_columns::QUANTITY,
            security: default_columns::SECURITY,
            unit_price: default_columns::UNIT_PRICE,
            price_date: Some(default_columns::PRICE_DATE),
            total_value: default_columns::TOTAL_VALUE,
            isin: None,
            ticker: None,
            from_header: false,
        }
    }
}

impl ColumnMapping {
    /// Analyze a table header row
    ///
    /// Falls back to the positional layout unless quantity, security, unit
    /// price and total value are all named.
    pub fn analyze(header_row: &str) -> Self {
        let mut found: Vec<(Column, usize)> = Vec::new();

        for (index, cell) in split_cells(header_row.trim()).into_iter().enumerate() {
            if let Some(column) = classify(cell) {
                if !found.iter().any(|(existing, _)| *existing == column) {
                    found.push((column, index));
                }
            }
        }

        let lookup = |column: Column| {
            found
                .iter()
                .find(|(existing, _)| *existing == column)
                .map(|(_, index)| *index)
        };

        match (
            lookup(Column::Quantity),
            lookup(Column::Security),
            lookup(Column::UnitPrice),
            lookup(Column::TotalValue),
        ) {
            (Some(quantity), Some(security), Some(unit_price), Some(total_value)) => Self {
                quantity,
                security,
                unit_price,
                price_date: lookup(Column::PriceDate),
                total_value,
                isin: lookup(Column::Isin),
                ticker: lookup(Column::Ticker),
                from_header: true,
            },
            _ => Self::default(),
        }
    }

    /// Highest segment index a row must have
    pub fn max_required_index(&self) -> usize {
        self.quantity
            .max(self.security)
            .max(self.unit_price)
            .max(self.total_value)
    }
}

/// Split a row on `|`, dropping trailing empty segments
///
/// `| a | b |` yields `["", " a ", " b "]`: the leading empty segment is kept
/// so that data columns start at index 1.
pub fn split_cells(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.split(CELL_DELIMITER).collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

/// Recognise a header cell; order matters since `Kurswert` starts with `Kurs`
fn classify(cell: &str) -> Option<Column> {
    let name = cell.trim().to_lowercase();

    if name.starts_with("stk") {
        Some(Column::Quantity)
    } else if name == "isin" {
        Some(Column::Isin)
    } else if name == "ticker" || name == "symbol" {
        Some(Column::Ticker)
    } else if name.starts_with("kursdatum") || name == "datum" {
        Some(Column::PriceDate)
    } else if name.starts_with("kurswert") {
        Some(Column::TotalValue)
    } else if name.starts_with("kurs") {
        Some(Column::UnitPrice)
    } else if name.starts_with("wertpapier") {
        Some(Column::Security)
    } else if name.starts_with("wert") {
        Some(Column::TotalValue)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_cells_drops_trailing_empty() {
        assert_eq!(split_cells("| a | b |"), vec!["", " a ", " b "]);
        assert_eq!(split_cells("| a | b"), vec!["", " a ", " b"]);
        assert_eq!(split_cells("| 5,00 | Incomplete Row |").len(), 3);
    }

    #[test]
    fn test_ticker_layout() {
        let mapping = ColumnMapping::analyze(
            "| STK. / Nominale | Wertpapierbezeichnung | Ticker | Kurs pro Stück (EUR) | Kursdatum | Kurswert (EUR) |",
        );

        assert!(mapping.from_header);
        assert_eq!(mapping.quantity, 1);
        assert_eq!(mapping.security, 2);
        assert_eq!(mapping.ticker, Some(3));
        assert_eq!(mapping.unit_price, 4);
        assert_eq!(mapping.price_date, Some(5));
        assert_eq!(mapping.total_value, 6);
        assert_eq!(mapping.isin, None);
        assert_eq!(mapping.max_required_index(), 6);
    }

    #[test]
    fn test_separate_isin_layout() {
        let mapping = ColumnMapping::analyze(
            "| STK. / Nominale | Wertpapier | ISIN | Symbol | Art | Kurs | Wert (EUR) |",
        );

        assert!(mapping.from_header);
        assert_eq!(mapping.security, 2);
        assert_eq!(mapping.isin, Some(3));
        assert_eq!(mapping.ticker, Some(4));
        assert_eq!(mapping.unit_price, 6);
        assert_eq!(mapping.total_value, 7);
        assert_eq!(mapping.price_date, None);
    }

    #[test]
    fn test_unrecognised_header_uses_positions() {
        let mapping = ColumnMapping::analyze("| STK. / Nominale | Bezeichnung | Preis | Datum | Betrag |");
        assert_eq!(mapping, ColumnMapping::default());
        assert_eq!(mapping.unit_price, 3);
        assert_eq!(mapping.total_value, 5);
    }
}
