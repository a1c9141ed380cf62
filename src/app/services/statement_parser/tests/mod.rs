//! Test fixtures for statement parser testing
//!
//! This module provides sample statements in both layouts, shared by the
//! test modules below.

use crate::app::models::StatementHeader;


/// Header used by row parser tests
pub fn test_header() -> StatementHeader {
    StatementHeader {
        depot_id: "TEST123".to_string(),
        statement_date: "01.12.2024".to_string(),
    }
}

/// Table statement with the ticker layout and inline ISINs
pub fn create_table_statement() -> String {
    r#"**Depot:** TEST123
**Datum:** 01.12.2024

| STK. / Nominale | Wertpapierbezeichnung | Ticker | Kurs pro Stück (EUR) | Kursdatum | Kurswert (EUR) |
|-----------------|-----------------------|--------|----------------------|-----------|----------------|
| 10,00 | Tesla Inc.<br>ISIN: US88160R1014 | TSLA | 250,50 | 01.12.2024 | 2.505,00 |
| 25,00 | Microsoft Corp.<br>ISIN: US5949181045 | MSFT | 350,00 | 01.12.2024 | 8.750,00 |

Summe | 11.255,00"#
        .to_string()
}

/// Table statement using the positional five-column layout
pub fn create_positional_table_statement() -> String {
    r#"**Depot:** 7000123
**Datum:** 15.11.2024

| STK. / Nominale | Bezeichnung | Preis | Datum | Betrag |
|---|---|---|---|---|
| 1.000,00 | Deutsche Telekom AG<br>ISIN: DE0005557508 | 22,85 | 15.11.2024 | 22.850,00 |
| 12,5 | Bond 2030 | 99,10 | 15.11.2024 | 1.238,75 |
"#
    .to_string()
}

/// Legacy statement with two positions, prose and custody metadata
pub fn create_line_statement() -> String {
    r#"**Depot:** 5550001
**Datum:** 01.01.2024
Depotauszug zum 01.01.2024
Seite 1 von 1

10,00 Stk. Stock A
ISIN: US1111111111
Lagerland: Deutschland
100,00
01.01.2024
1000,00

2,50 Stk. Stock B AG
Kurzbezeichnung
ISIN: DE2222222222
Wertpapierrechnung in Deutschland
Lagerland: Deutschland
40,10
01.01.2024
100,25
Ende des Depotauszugs"#
        .to_string()
}

/// Collect lines the way the parser does
pub fn lines_of(text: &str) -> Vec<&str> {
    text.lines().collect()
}
