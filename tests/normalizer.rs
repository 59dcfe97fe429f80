use quickcheck_macros::quickcheck;
use sentiment_chart_wasm::domain::sentiment::{
    RawDataset, RawRecord, RecordNormalizer, SeriesProjector, StockData, Timestamp,
};

const JAN_2: i64 = 1_704_153_600;
const DAY: i64 = 86_400;

fn record(open: f64, close: f64, high: f64, low: f64, sentiment: Option<f64>) -> RawRecord {
    RawRecord::new(
        Some(StockData { open: Some(open), close: Some(close), day_high: Some(high), day_low: Some(low) }),
        sentiment,
    )
}

#[test]
fn backend_payload_is_filtered_and_sorted() {
    let json = r#"{
        "2024-01-03": { "stock_data": { "Open": 11, "Close": 12, "maxDay": 13, "minDay": 10 }, "sentiment_score": -0.4 },
        "2024-01-02": { "stock_data": { "Open": 10, "Close": 11, "maxDay": 12, "minDay": 9 }, "sentiment_score": 0.2 },
        "2024-01-04": { "stock_data": { "error": "no data for ticker" }, "sentiment_score": 0.9 },
        "2024-01-05": { "stock_data": { "Open": 12, "Close": null, "maxDay": 14, "minDay": 11 } },
        "2024-01-06": { "sentiment_score": 0.1 },
        "someday": { "stock_data": { "Open": 1, "Close": 1, "maxDay": 1, "minDay": 1 } }
    }"#;
    let dataset = RawDataset::from_json(json).unwrap();
    let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);

    let times: Vec<i64> = points.iter().map(|p| p.time.value()).collect();
    assert_eq!(times, vec![JAN_2, JAN_2 + DAY]);
    assert_eq!(points[0].sentiment, 0.2);
    assert_eq!(points[1].high, 13.0);
    assert_eq!(report.kept, 2);
    assert_eq!(report.incomplete, 3);
    assert_eq!(report.unparseable_dates, 1);
}

#[test]
fn missing_sentiment_defaults_to_neutral() {
    let mut dataset = RawDataset::new();
    dataset.push("2024-01-02", record(1.0, 2.0, 3.0, 0.5, None));
    dataset.push("2024-01-03", record(1.0, 2.0, 3.0, 0.5, Some(f64::NAN)));
    let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
    assert!(points.iter().all(|p| p.sentiment == 0.0));
    assert_eq!(report.sentiment_defaulted, 2);
}

#[test]
fn same_day_keys_keep_the_last_entry() {
    let mut dataset = RawDataset::new();
    dataset.push("2024-01-02", record(1.0, 1.0, 1.0, 1.0, Some(0.1)));
    dataset.push("2024-01-02T16:00:00", record(2.0, 2.0, 2.0, 2.0, Some(0.2)));
    let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].open, 2.0);
    assert_eq!(report.overwritten, 1);
}

#[test]
fn duplicate_json_keys_are_preserved_in_order() {
    let json = r#"{
        "2024-01-02": { "stock_data": { "Open": 1, "Close": 1, "maxDay": 1, "minDay": 1 } },
        "2024-01-02": { "stock_data": { "Open": 5, "Close": 5, "maxDay": 5, "minDay": 5 } }
    }"#;
    let dataset = RawDataset::from_json(json).unwrap();
    assert_eq!(dataset.len(), 2);
    let points = RecordNormalizer::default().normalize(&dataset);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].close, 5.0);
}

#[test]
fn incomplete_later_duplicate_drops_the_date() {
    let json = r#"{
        "2024-01-02": { "stock_data": { "Open": 1, "Close": 1, "maxDay": 1, "minDay": 1 }, "sentiment_score": 0.3 },
        "2024-01-03": { "stock_data": { "Open": 2, "Close": 2, "maxDay": 2, "minDay": 2 } },
        "2024-01-02": { "stock_data": { "Open": 1, "Close": null, "maxDay": 1, "minDay": 1 } }
    }"#;
    let dataset = RawDataset::from_json(json).unwrap();
    let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
    let times: Vec<i64> = points.iter().map(|p| p.time.value()).collect();
    assert_eq!(times, vec![JAN_2 + DAY]);
    assert_eq!(report.overwritten, 1);
    assert_eq!(report.incomplete, 1);
}

#[test]
fn empty_input_is_not_an_error() {
    assert!(RecordNormalizer::default().normalize(&RawDataset::new()).is_empty());
    let dataset = RawDataset::from_json("{}").unwrap();
    assert!(RecordNormalizer::default().normalize(&dataset).is_empty());
}

#[test]
fn numeric_strings_are_accepted() {
    let json = r#"{ "2024-01-02": { "stock_data": { "Open": "10.5", "Close": "11", "maxDay": 12, "minDay": "9" }, "sentiment_score": "0.3" } }"#;
    let points = RecordNormalizer::default().normalize(&RawDataset::from_json(json).unwrap());
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].open, 10.5);
    assert_eq!(points[0].sentiment, 0.3);
}

fn dataset_from(entries: &[(u16, Option<i8>, bool)]) -> RawDataset {
    entries
        .iter()
        .map(|(day, sentiment, complete)| {
            let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(*day % 2000))))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let price = f64::from(*day);
            let stock = StockData {
                open: Some(price),
                close: complete.then_some(price + 1.0),
                day_high: Some(price + 2.0),
                day_low: Some(price - 1.0),
            };
            let record = RawRecord::new(Some(stock), sentiment.map(|s| f64::from(s) / 100.0));
            (date, record)
        })
        .collect()
}

#[quickcheck]
fn output_is_strictly_increasing_and_complete(entries: Vec<(u16, Option<i8>, bool)>) -> bool {
    let points = RecordNormalizer::default().normalize(&dataset_from(&entries));
    let increasing = points.windows(2).all(|w| w[0].time < w[1].time);
    let finite = points
        .iter()
        .all(|p| [p.open, p.high, p.low, p.close, p.sentiment].iter().all(|v| v.is_finite()));
    let bounded = points.len() <= entries.iter().filter(|(_, _, complete)| *complete).count();
    increasing && finite && bounded
}

#[quickcheck]
fn projection_preserves_every_point(entries: Vec<(u16, Option<i8>, bool)>) -> bool {
    let points = RecordNormalizer::default().normalize(&dataset_from(&entries));
    let series = SeriesProjector::project(&points);
    series.candles.len() == points.len()
        && series.sentiment.len() == points.len()
        && points.iter().all(|p| {
            let candle = series.candles.binary_search_by_key(&p.time, |c| c.time).ok().map(|i| &series.candles[i]);
            let sentiment = series.sentiment.binary_search_by_key(&p.time, |s| s.time).ok().map(|i| &series.sentiment[i]);
            matches!(candle, Some(c) if c.open == p.open && c.high == p.high && c.low == p.low && c.close == p.close)
                && matches!(sentiment, Some(s) if s.value == p.sentiment)
        })
}

#[test]
fn timestamps_are_midnight_utc() {
    let mut dataset = RawDataset::new();
    dataset.push("2024-01-02 09:30", record(1.0, 1.0, 1.0, 1.0, None));
    let points = RecordNormalizer::default().normalize(&dataset);
    assert_eq!(points[0].time, Timestamp::new(JAN_2));
}
