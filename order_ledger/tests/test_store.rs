use chrono::{NaiveDate, TimeZone, Utc};
use order_ledger::{
    DateWindow, InMemoryOrderStore, LedgerError, OrderRecord, OrderStatus, OrderStore,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal_macros::dec;

fn record(id: u64, y: i32, m: u32, d: u32) -> OrderRecord {
    OrderRecord::new(
        id,
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        dec!(19.99),
        2,
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn all_window_returns_everything() {
    let store = InMemoryOrderStore::with_records(vec![
        record(1, 2024, 1, 1),
        record(2, 2024, 6, 15),
        record(3, 2024, 12, 31),
    ]);

    let records = store.orders_in(&DateWindow::all()).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn bounded_window_is_inclusive() {
    let store = InMemoryOrderStore::with_records(vec![
        record(1, 2024, 3, 1),
        record(2, 2024, 3, 10),
        record(3, 2024, 3, 20),
    ]);

    let window = DateWindow::between(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
    let records = store.orders_in(&window).unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn inverted_window_is_rejected() {
    let result = DateWindow::between(date(2024, 5, 2), date(2024, 5, 1));
    assert!(matches!(result, Err(LedgerError::InvalidWindow { .. })));
}

#[rstest]
#[case(None, Some(date(2024, 2, 1)), date(2024, 1, 15), true)]
#[case(None, Some(date(2024, 2, 1)), date(2024, 2, 2), false)]
#[case(Some(date(2024, 2, 1)), None, date(2024, 1, 31), false)]
#[case(Some(date(2024, 2, 1)), None, date(2024, 2, 1), true)]
fn half_open_windows(
    #[case] start: Option<NaiveDate>,
    #[case] end: Option<NaiveDate>,
    #[case] probe: NaiveDate,
    #[case] expected: bool,
) {
    let window = DateWindow { start, end };
    assert_eq!(window.contains(probe), expected);
}

#[test]
fn new_records_default_to_pending() {
    let r = record(7, 2024, 4, 4);
    assert_eq!(r.status, OrderStatus::Pending);
}

#[test]
fn push_grows_the_store() {
    let mut store = InMemoryOrderStore::new();
    assert!(store.is_empty());
    store.push(record(1, 2024, 1, 1));
    store.push(record(2, 2024, 1, 2));
    assert_eq!(store.len(), 2);
}
