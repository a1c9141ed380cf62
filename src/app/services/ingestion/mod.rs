//! Statement ingestion
//!
//! Ties the parser to storage: parse the statement, record the client of the
//! depot, then replace the depot's holdings with the parsed records. The
//! returned [`IngestSummary`] is the only place the resolved depot id is
//! reported.
//!
//! ## Usage
//!
//! ```rust
//! use depot_ingest::{HoldingStore, InMemoryHoldingStore, ingest};
//!
//! let store = InMemoryHoldingStore::new();
//! let summary = ingest("**Depot:** 42\n1,00 Stk. A\nISIN: XX0000000001\n2,00\n-\n2,00", &store).unwrap();
//!
//! assert_eq!(summary.depot_id, "42");
//! assert_eq!(store.find_holdings("42").unwrap().len(), 1);
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::Result;
use crate::app::models::IngestSummary;
use crate::app::services::holding_store::HoldingStore;
use crate::app::services::statement_parser::{ParseOutcome, parse_statement};
use crate::app::services::text_extractor::{PlainTextExtractor, TextExtractor};

pub mod depot_locks;


pub use depot_locks::DepotLocks;

/// Parse a statement and replace the stored holdings of its depot
///
/// Relies on the store's atomic replace for concurrent callers; use an
/// [`Ingestor`] to also serialize ingestions of the same depot.
pub fn ingest(raw_text: &str, store: &dyn HoldingStore) -> Result<IngestSummary> {
    store_outcome(parse_statement(raw_text), store)
}

/// Extract the text of an uploaded file, then [`ingest`] it
pub fn ingest_file(
    bytes: &[u8],
    filename: &str,
    extractor: &dyn TextExtractor,
    store: &dyn HoldingStore,
) -> Result<IngestSummary> {
    let text = extractor.extract(bytes, filename)?;
    ingest(&text, store)
}

fn store_outcome(outcome: ParseOutcome, store: &dyn HoldingStore) -> Result<IngestSummary> {
    let ParseOutcome {
        header,
        format,
        records,
        stats,
    } = outcome;

    if !header.has_depot() {
        warn!("Statement has no depot marker, storing holdings under an empty depot id");
    }

    let summary = IngestSummary {
        depot_id: header.depot_id,
        record_count: records.len(),
        skipped_row_count: stats.rows_skipped,
        format,
    };

    store
        .upsert_client_tag(&summary.depot_id)
        .inspect_err(|e| warn!("Client bookkeeping failed for '{}': {}", summary.depot_id, e))?;
    store
        .replace_holdings(&summary.depot_id, records)
        .inspect_err(|e| warn!("Replacing holdings failed for '{}': {}", summary.depot_id, e))?;

    info!(
        "Ingested depot '{}': {} records, {} skipped ({} format)",
        summary.depot_id, summary.record_count, summary.skipped_row_count, summary.format
    );

    Ok(summary)
}

/// Ingestion pipeline bound to one store and extractor
///
/// Holds a [`DepotLocks`] registry so that ingestions of the same depot are
/// serialized even when the store could interleave them.
pub struct Ingestor {
    store: Arc<dyn HoldingStore>,
    extractor: Arc<dyn TextExtractor>,
    locks: DepotLocks,
}

impl Ingestor {
    /// Create an ingestor reading plain text statements
    pub fn new(store: Arc<dyn HoldingStore>) -> Self {
        Self {
            store,
            extractor: Arc::new(PlainTextExtractor),
            locks: DepotLocks::new(),
        }
    }

    /// Use a different text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Store the ingestor writes to
    pub fn store(&self) -> &Arc<dyn HoldingStore> {
        &self.store
    }

    /// Ingest statement text
    pub fn ingest(&self, raw_text: &str) -> Result<IngestSummary> {
        let outcome = parse_statement(raw_text);
        let depot_id = outcome.header.depot_id.clone();

        self.locks
            .with_lock(&depot_id, || store_outcome(outcome, self.store.as_ref()))
    }

    /// Ingest an uploaded document
    pub fn ingest_file(&self, bytes: &[u8], filename: &str) -> Result<IngestSummary> {
        let text = self.extractor.extract(bytes, filename)?;
        self.ingest(&text)
    }

    /// Read and ingest a statement file
    pub fn ingest_path(&self, path: &Path) -> Result<IngestSummary> {
        let bytes = fs::read(path)
            .map_err(|e| crate::Error::io(format!("Failed to read {}", path.display()), e))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        self.ingest_file(&bytes, filename)
    }
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("locked_depots", &self.locks.len())
            .finish_non_exhaustive()
    }
}
