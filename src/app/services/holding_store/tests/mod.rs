//! Test fixtures for holding store testing
//!
//! The contract checks in this module run against every store
//! implementation.

use super::HoldingStore;
use crate::app::models::HoldingRecord;
use rust_decimal_macros::dec;


/// Holding of a depot with a distinct ISIN
pub fn holding(depot_id: &str, isin: &str, quantity: rust_decimal::Decimal) -> HoldingRecord {
    HoldingRecord::new(
        depot_id,
        format!("Asset {}", isin),
        isin,
        quantity,
        dec!(12.34),
        quantity * dec!(12.34),
        "01.12.2024",
    )
}

pub fn check_replace_is_not_merge(store: &dyn HoldingStore) {
    store
        .replace_holdings(
            "D1",
            vec![holding("D1", "A", dec!(1)), holding("D1", "B", dec!(2))],
        )
        .unwrap();
    store
        .replace_holdings("D1", vec![holding("D1", "C", dec!(3))])
        .unwrap();

    let stored = store.find_holdings("D1").unwrap();
    assert_eq!(stored, vec![holding("D1", "C", dec!(3))]);
}

pub fn check_depots_are_isolated(store: &dyn HoldingStore) {
    store
        .replace_holdings("D1", vec![holding("D1", "A", dec!(1))])
        .unwrap();
    store
        .replace_holdings("D2", vec![holding("D2", "B", dec!(2))])
        .unwrap();
    store.replace_holdings("D1", Vec::new()).unwrap();

    assert!(store.find_holdings("D1").unwrap().is_empty());
    assert_eq!(store.find_holdings("D2").unwrap().len(), 1);
    assert!(store.find_holdings("unknown").unwrap().is_empty());
}

pub fn check_order_and_duplicates_preserved(store: &dyn HoldingStore) {
    let records = vec![
        holding("D1", "", dec!(1)),
        holding("D1", "Z", dec!(2.5)),
        holding("D1", "", dec!(3)),
    ];
    store.replace_holdings("D1", records.clone()).unwrap();

    let stored = store.find_holdings("D1").unwrap();
    assert_eq!(stored, records);
    assert_eq!(stored[0].instrument_key, stored[2].instrument_key);
}

pub fn check_client_tag_lifecycle(store: &dyn HoldingStore) {
    assert!(store.find_client("D1").unwrap().is_none());

    store.upsert_client_tag("D1").unwrap();
    let first = store.find_client("D1").unwrap().unwrap();
    assert_eq!(first.depot_id, "D1");
    assert_eq!(first.name, "Client D1");
    assert_eq!(first.first_seen, first.last_seen);

    store.upsert_client_tag("D1").unwrap();
    let second = store.find_client("D1").unwrap().unwrap();
    assert_eq!(second.first_seen, first.first_seen);
    assert!(second.last_seen >= first.last_seen);
}

pub fn check_empty_depot_id(store: &dyn HoldingStore) {
    store.upsert_client_tag("").unwrap();
    store
        .replace_holdings("", vec![holding("", "A", dec!(1))])
        .unwrap();

    assert_eq!(store.find_holdings("").unwrap()[0].instrument_key, "-A");
    assert_eq!(store.find_client("").unwrap().unwrap().name, "Client ");
}
