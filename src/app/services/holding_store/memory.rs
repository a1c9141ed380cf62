//! In-memory holding store

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::HoldingStore;
use crate::app::models::{ClientTag, HoldingRecord};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct StoreState {
    holdings: HashMap<String, Vec<HoldingRecord>>,
    clients: HashMap<String, ClientTag>,
}

/// Holding store kept in process memory
///
/// A single lock guards all depots, which makes `replace_holdings` atomic.
#[derive(Debug, Default)]
pub struct InMemoryHoldingStore {
    state: RwLock<StoreState>,
}

impl InMemoryHoldingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of depots with stored holdings
    pub fn depot_count(&self) -> Result<usize> {
        Ok(self.read()?.holdings.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| Error::storage("In-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| Error::storage("In-memory store lock poisoned"))
    }
}

impl HoldingStore for InMemoryHoldingStore {
    fn find_holdings(&self, depot_id: &str) -> Result<Vec<HoldingRecord>> {
        Ok(self
            .read()?
            .holdings
            .get(depot_id)
            .cloned()
            .unwrap_or_default())
    }

    fn replace_holdings(&self, depot_id: &str, records: Vec<HoldingRecord>) -> Result<()> {
        let mut state = self.write()?;
        let previous = state.holdings.insert(depot_id.to_string(), records);

        debug!(
            "Replaced {} holdings of depot '{}'",
            previous.map_or(0, |records| records.len()),
            depot_id
        );
        Ok(())
    }

    fn upsert_client_tag(&self, depot_id: &str) -> Result<()> {
        let now = Utc::now();
        let mut state = self.write()?;

        state
            .clients
            .entry(depot_id.to_string())
            .and_modify(|client| client.touch(now))
            .or_insert_with(|| ClientTag::first_seen_at(depot_id, now));
        Ok(())
    }

    fn find_client(&self, depot_id: &str) -> Result<Option<ClientTag>> {
        Ok(self.read()?.clients.get(depot_id).cloned())
    }
}
