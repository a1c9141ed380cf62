//! Data models for depot ingestion
//!
//! This module contains the core data structures produced while ingesting a
//! portfolio statement: the statement header, holding records, the detected
//! layout, and the bookkeeping record kept per client depot.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Statement Header
// =============================================================================

/// Depot identifier and statement date found in a statement's free text
///
/// Both fields are empty strings when the corresponding marker line is
/// missing; an empty header never fails ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementHeader {
    /// Depot (portfolio/account) identifier, the tenant key for replacement
    pub depot_id: String,

    /// Statement date exactly as written in the statement
    pub statement_date: String,
}

impl StatementHeader {
    /// Check whether the depot marker was found
    pub fn has_depot(&self) -> bool {
        !self.depot_id.is_empty()
    }
}

// =============================================================================
// Holding Record
// =============================================================================

/// One parsed statement position
///
/// `instrument_key` is `depot_id + "-" + isin` and is not unique within a
/// statement when ISINs are missing or repeated. Stores replace all records
/// of a depot at once, so the key is never used for upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Depot the position belongs to
    pub depot_id: String,

    /// `depot_id-isin`
    pub instrument_key: String,

    /// Security name as printed in the statement
    pub asset_name: String,

    /// ISIN, empty when the statement does not carry one
    pub isin: String,

    /// Exchange ticker, when the table layout has a ticker column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,

    /// Number of shares or nominal amount
    pub quantity: Decimal,

    /// Price per unit
    pub unit_price: Decimal,

    /// Market value of the position
    pub total_value: Decimal,

    /// Statement date (taken from the header, not from the row)
    pub date: String,
}

impl HoldingRecord {
    /// Create a new record, deriving the instrument key
    pub fn new(
        depot_id: impl Into<String>,
        asset_name: impl Into<String>,
        isin: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        total_value: Decimal,
        date: impl Into<String>,
    ) -> Self {
        let depot_id = depot_id.into();
        let isin = isin.into();

        Self {
            instrument_key: instrument_key(&depot_id, &isin),
            depot_id,
            asset_name: asset_name.into(),
            isin,
            ticker: None,
            quantity,
            unit_price,
            total_value,
            date: date.into(),
        }
    }

    /// Attach a ticker symbol
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        let ticker = ticker.into();
        self.ticker = if ticker.is_empty() { None } else { Some(ticker) };
        self
    }
}

/// Build the instrument key of a position
pub fn instrument_key(depot_id: &str, isin: &str) -> String {
    format!("{}-{}", depot_id, isin)
}

// =============================================================================
// Statement Layout
// =============================================================================

/// Statement layout, decided once per document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Markdown table with a `| STK. / Nominale |` header
    Table,

    /// Legacy layout with one field per line
    LineOriented,
}

impl FormatKind {
    /// Stable lowercase name used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Table => "table",
            FormatKind::LineOriented => "line_oriented",
        }
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "table" => Ok(FormatKind::Table),
            "line_oriented" => Ok(FormatKind::LineOriented),
            _ => Err(Error::data_validation(format!(
                "Invalid statement format '{}': must be table or line_oriented",
                s
            ))),
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Ingestion Summary
// =============================================================================

/// What an ingestion call reports back to its caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Resolved depot identifier (possibly empty)
    pub depot_id: String,

    /// Number of records stored for the depot
    pub record_count: usize,

    /// Number of rows or blocks dropped while parsing
    pub skipped_row_count: usize,

    /// Layout the statement was parsed as
    pub format: FormatKind,
}

// =============================================================================
// Client Bookkeeping
// =============================================================================

/// Record that a depot has been seen by the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTag {
    /// Depot identifier, also the client identifier
    pub depot_id: String,

    /// Display name (`Client <depot>`)
    pub name: String,

    /// First ingestion for this depot
    pub first_seen: DateTime<Utc>,

    /// Most recent ingestion for this depot
    pub last_seen: DateTime<Utc>,
}

impl ClientTag {
    /// Create a tag for a depot seen for the first time
    pub fn first_seen_at(depot_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        let depot_id = depot_id.into();
        Self {
            name: client_name(&depot_id),
            depot_id,
            first_seen: at,
            last_seen: at,
        }
    }

    /// Mark the depot as seen again
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_seen = at;
    }
}

/// Display name given to the client owning a depot
pub fn client_name(depot_id: &str) -> String {
    format!("{}{}", crate::constants::CLIENT_NAME_PREFIX, depot_id)
}
