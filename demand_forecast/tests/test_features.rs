use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use demand_forecast::features::{calendar_covariates, is_weekend, FeatureBuilder};
use demand_forecast::series::MetricSeries;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn series_of(len: usize) -> MetricSeries {
    // Monday 2024-01-01 start; values are just the index
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    MetricSeries::new(start, (0..len).map(|i| i as f64).collect())
}

#[test]
fn one_row_per_day_in_order() {
    let series = series_of(10);
    let rows = FeatureBuilder::new().build(&series);

    assert_eq!(rows.len(), 10);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.date, series.date_at(i));
    }
}

#[test]
fn lag_markers_follow_availability() {
    let series = series_of(10);
    let rows = FeatureBuilder::new().build(&series);

    // First row has no previous day at all
    assert_eq!(rows[0].lag_1, None);
    assert_eq!(rows[1].lag_1, Some(0.0));

    // Seven-day lookbacks are unavailable for the first seven rows
    for row in &rows[..7] {
        assert_eq!(row.lag_7, None);
        assert_eq!(row.rolling_mean_7, None);
    }
    assert_eq!(rows[7].lag_7, Some(0.0));
    assert_eq!(rows[9].lag_7, Some(2.0));
}

#[test]
fn rolling_mean_uses_prior_week_only() {
    let series = series_of(9);
    let rows = FeatureBuilder::new().build(&series);

    // Mean of values 0..=6 for row 7, 1..=7 for row 8
    assert_approx_eq!(rows[7].rolling_mean_7.unwrap(), 3.0);
    assert_approx_eq!(rows[8].rolling_mean_7.unwrap(), 4.0);
}

#[rstest]
#[case(2024, 1, 1, 0, false)] // Monday
#[case(2024, 1, 5, 4, false)] // Friday
#[case(2024, 1, 6, 5, true)] // Saturday
#[case(2024, 1, 7, 6, true)] // Sunday
fn calendar_fields(
    #[case] y: i32,
    #[case] m: u32,
    #[case] d: u32,
    #[case] dow: u32,
    #[case] weekend: bool,
) {
    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(is_weekend(date), weekend);

    let series = MetricSeries::new(date, vec![1.0]);
    let rows = FeatureBuilder::new().build(&series);
    assert_eq!(rows[0].day_of_week, dow);
    assert_eq!(rows[0].is_weekend, weekend);
    assert_eq!(rows[0].month, m);
}

#[test]
fn covariates_repeat_weekly() {
    let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let next_monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

    let a = calendar_covariates(monday);
    let b = calendar_covariates(next_monday);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_approx_eq!(x, y);
    }
}

#[test]
fn weekend_dummy_matches_weekday() {
    let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_approx_eq!(calendar_covariates(saturday)[0], 1.0);
    assert_approx_eq!(calendar_covariates(tuesday)[0], 0.0);
}
