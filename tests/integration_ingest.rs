//! Integration tests for statement ingestion through the public API
//!
//! These tests write statements to disk, ingest them into a SQLite database
//! in a temporary directory and read the stored holdings back.

use depot_ingest::app::services::text_extractor::PlainTextExtractor;
use depot_ingest::app::services::ingestion::ingest_file;
use depot_ingest::cli::commands::ingest::ingest_files;
use depot_ingest::{FormatKind, HoldingStore, Ingestor, SqliteHoldingStore, ingest};
use rust_decimal_macros::dec;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const TABLE_STATEMENT: &str = "\
**Depot:** UPLOAD001
**Datum:** 2024-01-20

Vermögensaufstellung

| STK. / Nominale | Wertpapierbezeichnung | Ticker | Kurs pro Stück (EUR) | Kursdatum | Kurswert (EUR) |
|-----------------|-----------------------|--------|----------------------|-----------|----------------|
| 15,00 | Tesla Inc.<br>ISIN: US88160R1014 | TSLA | 250,00 | 2024-01-20 | 3.750,00 |
| 100,00 | Apple Inc.<br>ISIN: US0378331005 | AAPL | 180,50 | 2024-01-20 | 18.050,00 || 40,00 | SAP SE<br>ISIN: DE0007164600 | SAP | 150,00 | 2024-01-20 | 6.000,00 |
| 5,00 | Incomplete Row |

Gesamtwert | 27.800,00
";

const LINE_STATEMENT: &str = "\
**Depot:** UPLOAD001
**Datum:** 2024-02-01
Depotauszug

12,50 Stk. Siemens AG
ISIN: DE0007236101
Lagerland: Deutschland
170,00
01.02.2024
2125,00
";

/// Test the full table layout including a collapsed `||` line
///
/// Purpose: Validate end-to-end table ingestion into SQLite
/// Benefit: Covers header mapping, row splitting and decimal persistence together
#[test]
fn test_ingest_table_statement_into_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteHoldingStore::open(temp_dir.path().join("holdings.sqlite")).unwrap();

    let summary = ingest(TABLE_STATEMENT, &store).unwrap();

    assert_eq!(summary.depot_id, "UPLOAD001");
    assert_eq!(summary.format, FormatKind::Table);
    assert_eq!(summary.record_count, 3);
    assert_eq!(summary.skipped_row_count, 1);

    let holdings = store.find_holdings("UPLOAD001").unwrap();
    let isins: Vec<&str> = holdings.iter().map(|h| h.isin.as_str()).collect();
    assert_eq!(isins, vec!["US88160R1014", "US0378331005", "DE0007164600"]);

    let tesla = &holdings[0];
    assert_eq!(tesla.asset_name, "Tesla Inc.");
    assert_eq!(tesla.ticker.as_deref(), Some("TSLA"));
    assert_eq!(tesla.quantity, dec!(15));
    assert_eq!(tesla.unit_price, dec!(250));
    assert_eq!(tesla.total_value, dec!(3750));
    assert_eq!(tesla.date, "2024-01-20");

    assert_eq!(holdings[2].asset_name, "SAP SE");
    assert_eq!(holdings[2].total_value, dec!(6000));
}

/// Test that a second statement for a depot replaces the first
///
/// Purpose: Validate replace-by-depot semantics across layouts
/// Benefit: Guards against merged or duplicated holdings after re-upload
#[test]
fn test_reingest_replaces_previous_holdings() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteHoldingStore::open(temp_dir.path().join("holdings.sqlite")).unwrap();

    ingest(TABLE_STATEMENT, &store).unwrap();
    let first_client = store.find_client("UPLOAD001").unwrap().unwrap();

    let summary = ingest(LINE_STATEMENT, &store).unwrap();
    assert_eq!(summary.format, FormatKind::LineOriented);

    let holdings = store.find_holdings("UPLOAD001").unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].asset_name, "Siemens AG");
    // Line-oriented quantities are rounded half away from zero
    assert_eq!(holdings[0].quantity, dec!(13));
    assert_eq!(holdings[0].date, "2024-02-01");

    let client = store.find_client("UPLOAD001").unwrap().unwrap();
    assert_eq!(client.first_seen, first_client.first_seen);
    assert_eq!(client.name, "Client UPLOAD001");
}

/// Test uploads that are not text documents
#[test]
fn test_ingest_file_rejects_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteHoldingStore::open(temp_dir.path().join("holdings.sqlite")).unwrap();

    let result = ingest_file(b"%PDF-1.7", "statement.pdf", &PlainTextExtractor, &store);

    assert!(result.is_err());
    assert!(store.find_client("").unwrap().is_none());
}

/// Test concurrent ingestion of a directory worth of files
///
/// Purpose: Validate the bounded parallel ingestion used by the CLI
/// Benefit: Ensures distinct depots do not interfere when written concurrently
#[tokio::test]
async fn test_parallel_ingestion_of_many_depots() {
    let temp_dir = TempDir::new().unwrap();
    let statements_dir = temp_dir.path().join("statements");
    fs::create_dir_all(&statements_dir).unwrap();

    let mut files = Vec::new();
    for depot in 0..12 {
        let path = statements_dir.join(format!("depot_{depot:02}.md"));
        fs::write(&path, LINE_STATEMENT.replace("UPLOAD001", &format!("DEPOT{depot:02}"))).unwrap();
        files.push(path);
    }

    let store = Arc::new(SqliteHoldingStore::open(temp_dir.path().join("holdings.sqlite")).unwrap());
    let ingestor = Arc::new(Ingestor::new(store.clone()));

    let outcomes = ingest_files(ingestor, files, 4, None).await;

    assert_eq!(outcomes.len(), 12);
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));

    for depot in 0..12 {
        let holdings = store.find_holdings(&format!("DEPOT{depot:02}")).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].instrument_key, format!("DEPOT{depot:02}-DE0007236101"));
    }
}
