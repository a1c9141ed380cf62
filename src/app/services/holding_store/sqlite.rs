//! SQLite holding store
//!
//! Holdings and client tags live in two tables (see `schema.sql`). Decimal
//! values and timestamps are stored as text and converted on read.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::HoldingStore;
use crate::app::models::{ClientTag, HoldingRecord, client_name};
use crate::{Error, Result};

/// Holding store backed by a SQLite database file
///
/// The connection sits behind a mutex; every replace runs in one
/// transaction.
#[derive(Debug)]
pub struct SqliteHoldingStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteHoldingStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::database(format!("Failed to open database {}", path.display()), e)
        })?;

        info!("Opened holding database {}", path.display());
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// Create a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::database("Failed to open in-memory database", e))?;
        Self::with_connection(conn, None)
    }

    /// Database file path, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(|e| Error::database("Failed to initialize schema", e))?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::storage("SQLite connection lock poisoned"))
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<HoldingRecord> {
        Ok(HoldingRecord {
            depot_id: row.get(0)?,
            instrument_key: row.get(1)?,
            asset_name: row.get(2)?,
            isin: row.get(3)?,
            ticker: row.get(4)?,
            quantity: decimal_column(row, 5)?,
            unit_price: decimal_column(row, 6)?,
            total_value: decimal_column(row, 7)?,
            date: row.get(8)?,
        })
    }
}

impl HoldingStore for SqliteHoldingStore {
    fn find_holdings(&self, depot_id: &str) -> Result<Vec<HoldingRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT depot_id, instrument_key, asset_name, isin, ticker, quantity, unit_price, total_value, date
             FROM holdings WHERE depot_id = ?1 ORDER BY id",
        )?;

        let records = stmt
            .query_map(params![depot_id], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::database(format!("Failed to read holdings of '{}'", depot_id), e))?;

        Ok(records)
    }

    fn replace_holdings(&self, depot_id: &str, records: Vec<HoldingRecord>) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM holdings WHERE depot_id = ?1", params![depot_id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO holdings (depot_id, instrument_key, asset_name, isin, ticker, quantity, unit_price, total_value, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for record in &records {
                stmt.execute(params![
                    depot_id,
                    &record.instrument_key,
                    &record.asset_name,
                    &record.isin,
                    &record.ticker,
                    record.quantity.to_string(),
                    record.unit_price.to_string(),
                    record.total_value.to_string(),
                    &record.date,
                ])
                .map_err(|e| {
                    Error::database(format!("Failed to insert holding '{}'", record.instrument_key), e)
                })?;
            }
        }

        tx.commit()
            .map_err(|e| Error::database(format!("Failed to commit holdings of '{}'", depot_id), e))?;

        debug!(
            "Replaced {} holdings of depot '{}' with {}",
            deleted,
            depot_id,
            records.len()
        );
        Ok(())
    }

    fn upsert_client_tag(&self, depot_id: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO clients (depot_id, name, first_seen, last_seen)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(depot_id) DO UPDATE SET last_seen = excluded.last_seen",
            params![depot_id, client_name(depot_id), now],
        )
        .map_err(|e| Error::database(format!("Failed to upsert client '{}'", depot_id), e))?;

        Ok(())
    }

    fn find_client(&self, depot_id: &str) -> Result<Option<ClientTag>> {
        let conn = self.lock()?;

        let client = conn
            .query_row(
                "SELECT depot_id, name, first_seen, last_seen FROM clients WHERE depot_id = ?1",
                params![depot_id],
                |row| {
                    Ok(ClientTag {
                        depot_id: row.get(0)?,
                        name: row.get(1)?,
                        first_seen: timestamp_column(row, 2)?,
                        last_seen: timestamp_column(row, 3)?,
                    })
                },
            )
            .optional()?;

        Ok(client)
    }
}

fn decimal_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(index)?;
    Decimal::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
}
