//! Application constants for depot ingestion
//!
//! This module contains the literal markers recognised in statements,
//! configuration defaults, and file patterns used throughout the crate.

// =============================================================================
// Statement Header Markers
// =============================================================================

/// Marker preceding the depot identifier (e.g. `**Depot:** 1234567`)
pub const DEPOT_MARKER: &str = "**Depot:**";

/// Marker preceding the statement date (e.g. `**Datum:** 01.12.2024`)
pub const DATE_MARKER: &str = "**Datum:**";

// =============================================================================
// Table Format Markers
// =============================================================================

/// Column header fragment whose presence identifies the table format
pub const TABLE_HEADER_FRAGMENT: &str = "| STK. / Nominale |";

/// Header cell text, used to recognise repeated header rows inside a table
pub const TABLE_HEADER_CELL: &str = "STK. / Nominale";

/// Prefix of markdown separator rows (`|---|---|`)
pub const TABLE_SEPARATOR_PREFIX: &str = "|---";

/// Token joining rows that a renderer collapsed onto one physical line
pub const CONCATENATED_ROW_SEPARATOR: &str = "||";

/// Cell delimiter
pub const CELL_DELIMITER: char = '|';

/// Inline line break markup inside security name cells
pub const LINE_BREAK_MARKUP: &str = "<br>";

/// Marker preceding the ISIN inside a security name cell
pub const INLINE_ISIN_MARKER: &str = "ISIN: ";

/// Minimum number of `|`-split segments a data row must produce
pub const MIN_ROW_SEGMENTS: usize = 6;

/// Default positional column layout (segment indices after the leading empty one)
pub mod default_columns {
    pub const QUANTITY: usize = 1;
    pub const SECURITY: usize = 2;
    pub const UNIT_PRICE: usize = 3;
    pub const PRICE_DATE: usize = 4;
    pub const TOTAL_VALUE: usize = 5;
}

// =============================================================================
// Line-Oriented Format Markers
// =============================================================================

/// Separator between quantity and security name on a position line
pub const POSITION_SEPARATOR: &str = " Stk. ";

/// Prefix of the ISIN line in a position block
pub const ISIN_LINE_PREFIX: &str = "ISIN:";

/// Number of characters cut from an ISIN line to obtain the code
pub const ISIN_LINE_CUT: usize = 6;

/// Prefix of custody-country metadata lines
pub const CUSTODY_COUNTRY_PREFIX: &str = "Lagerland:";

/// Token of custody-account metadata lines
pub const CUSTODY_ACCOUNT_TOKEN: &str = "Wertpapierrechnung";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Default SQLite database file name
pub const DEFAULT_DATABASE_FILE: &str = "holdings.sqlite";

/// Default number of statements ingested concurrently
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 4;

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "DEPOT_INGEST_DATABASE";

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "depot-ingest";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Statement File Patterns
// =============================================================================

/// File extensions accepted by the plain text extractor
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Prefix of the display name given to newly seen clients
pub const CLIENT_NAME_PREFIX: &str = "Client ";
