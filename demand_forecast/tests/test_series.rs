use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use demand_forecast::error::ForecastError;
use demand_forecast::series::{Metric, SeriesAggregator};
use order_ledger::OrderRecord;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use rust_decimal_macros::dec;

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn order_on(id: u64, date: NaiveDate, hour: u32) -> OrderRecord {
    let ts = Utc
        .from_local_datetime(&date.and_hms_opt(hour, 30, 0).unwrap())
        .unwrap();
    OrderRecord::new(id, ts, dec!(25.00), 1)
}

fn aggregator_for(last_day: NaiveDate) -> SeriesAggregator {
    SeriesAggregator::new(utc_offset()).with_reference_date(last_day)
}

#[test]
fn empty_input_is_insufficient_data() {
    let result = aggregator_for(date(2024, 1, 31)).aggregate(&[]);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

/// Sparse inputs in arbitrary order still produce one point per
/// calendar day over the full span.
#[rstest]
#[case(vec![0, 5, 2, 9])]
#[case(vec![3, 3, 3])]
#[case(vec![13, 0, 1, 12, 6, 6])]
#[case(vec![7])]
fn series_has_no_gaps(#[case] day_offsets: Vec<i64>) {
    let start = date(2024, 2, 1);
    let records: Vec<OrderRecord> = day_offsets
        .iter()
        .enumerate()
        .map(|(i, &off)| order_on(i as u64 + 1, start + Duration::days(off), 10))
        .collect();

    let series = aggregator_for(date(2024, 2, 29)).aggregate(&records).unwrap();

    let first = series.first_date().unwrap();
    let last = series.last_date().unwrap();
    let expected_len = (last - first).num_days() as usize + 1;
    assert_eq!(series.len(), expected_len);

    // Strictly ascending, no duplicates
    for pair in series.points().windows(2) {
        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
    }
}

#[test]
fn randomized_sparse_inputs_stay_gap_free() {
    let mut rng = StdRng::seed_from_u64(42);
    let start = date(2024, 7, 1);

    for _ in 0..25 {
        let n_orders: u64 = rng.gen_range(1..30);
        let records: Vec<OrderRecord> = (0..n_orders)
            .map(|i| {
                let offset = rng.gen_range(0..45);
                let hour = rng.gen_range(0..24);
                order_on(i + 1, start + Duration::days(offset), hour)
            })
            .collect();

        let series = aggregator_for(date(2024, 8, 31)).aggregate(&records).unwrap();

        let first = series.first_date().unwrap();
        let last = series.last_date().unwrap();
        assert_eq!(series.len(), (last - first).num_days() as usize + 1);
        for pair in series.points().windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }

        let total: u32 = series.points().iter().map(|p| p.order_count).sum();
        assert_eq!(total as u64, n_orders);
    }
}

#[test]
fn missing_days_are_explicit_zeros() {
    let start = date(2024, 3, 1);
    let records = vec![
        order_on(1, start, 9),
        order_on(2, start + Duration::days(3), 15),
    ];

    let series = aggregator_for(date(2024, 3, 31)).aggregate(&records).unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series.points()[1].order_count, 0);
    assert_eq!(series.points()[1].revenue, dec!(0));
    assert_eq!(series.points()[2].order_count, 0);
    assert_eq!(series.days_with_orders(), 2);
}

#[test]
fn per_day_sums_cover_both_metrics() {
    let day = date(2024, 4, 10);
    let records = vec![
        order_on(1, day, 8),
        order_on(2, day, 12),
        order_on(3, day, 19),
    ];

    let series = aggregator_for(day).aggregate(&records).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.points()[0].order_count, 3);
    assert_eq!(series.points()[0].revenue, dec!(75.00));

    let counts = series.metric_series(Metric::OrderCount);
    assert_eq!(counts.values(), &[3.0]);
    let revenue = series.metric_series(Metric::Revenue);
    assert_eq!(revenue.values(), &[75.0]);
}

#[test]
fn negative_amount_is_rejected_by_id() {
    let day = date(2024, 5, 1);
    let mut bad = order_on(42, day, 10);
    bad.total_amount = dec!(-3.50);
    let records = vec![order_on(1, day, 9), bad];

    match aggregator_for(day).aggregate(&records) {
        Err(ForecastError::InvalidRecord { id, .. }) => assert_eq!(id, 42),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn future_dated_order_is_rejected_by_id() {
    let today = date(2024, 5, 1);
    let records = vec![
        order_on(1, today, 9),
        order_on(99, today + Duration::days(2), 9),
    ];

    match aggregator_for(today).aggregate(&records) {
        Err(ForecastError::InvalidRecord { id, .. }) => assert_eq!(id, 99),
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn timezone_offset_moves_day_boundaries() {
    // 23:00 UTC on Jan 1 is already Jan 2 in UTC+05:30
    let colombo = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
    let record = OrderRecord::new(1, ts, dec!(10.00), 1);

    let series = SeriesAggregator::new(colombo)
        .with_reference_date(date(2024, 1, 5))
        .aggregate(&[record])
        .unwrap();

    assert_eq!(series.first_date().unwrap(), date(2024, 1, 2));
}

#[test]
fn metric_series_date_arithmetic() {
    let start = date(2024, 6, 1);
    let records = vec![
        order_on(1, start, 10),
        order_on(2, start + Duration::days(2), 10),
    ];
    let series = aggregator_for(date(2024, 6, 30)).aggregate(&records).unwrap();

    let ms = series.metric_series(Metric::OrderCount);
    assert_eq!(ms.start(), start);
    assert_eq!(ms.date_at(2), start + Duration::days(2));
    assert_eq!(ms.next_date(), start + Duration::days(3));
    assert_eq!(ms.head(2).values(), &[1.0, 0.0]);
    assert_eq!(ms.tail(1), &[1.0]);
}
