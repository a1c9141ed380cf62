//! Holding storage
//!
//! Persistent storage of parsed holdings and client bookkeeping, keyed by
//! depot identifier. Ingestion only ever replaces the complete holding set of
//! a depot, so stores expose an atomic replace instead of separate delete and
//! insert calls.
//!
//! ## Implementations
//!
//! - [`InMemoryHoldingStore`] - one lock around all depots, used by tests and
//!   dry runs
//! - [`SqliteHoldingStore`] - SQLite database, one transaction per replace

use crate::Result;
use crate::app::models::{ClientTag, HoldingRecord};

pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use memory::InMemoryHoldingStore;
pub use sqlite::SqliteHoldingStore;

/// Storage capability used by ingestion
///
/// Implementations must be shareable between threads: the CLI ingests
/// several statements concurrently against one store.
pub trait HoldingStore: Send + Sync {
    /// All holdings stored for a depot, in statement order
    fn find_holdings(&self, depot_id: &str) -> Result<Vec<HoldingRecord>>;

    /// Delete every holding of the depot and insert `records`, atomically
    ///
    /// Concurrent readers observe either the old or the new set, never a mix.
    fn replace_holdings(&self, depot_id: &str, records: Vec<HoldingRecord>) -> Result<()>;

    /// Create the client tag of a depot or refresh its `last_seen` time
    fn upsert_client_tag(&self, depot_id: &str) -> Result<()>;

    /// Client tag of a depot, if it was ever ingested
    fn find_client(&self, depot_id: &str) -> Result<Option<ClientTag>>;
}
