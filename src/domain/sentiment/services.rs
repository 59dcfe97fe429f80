use super::entities::{CandlePoint, NormalizedPoint, RawDataset, RawRecord, SentimentPoint};
use super::value_objects::Timestamp;
use crate::domain::logging::LogComponent;
use crate::time_utils::parse_date_key;
use std::collections::BTreeMap;

/// Sentiment substituted when a record carries none
pub const NEUTRAL_SENTIMENT: f64 = 0.0;

/// What the normalizer kept and why it dropped the rest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub kept: usize,
    pub incomplete: usize,
    pub unparseable_dates: usize,
    pub overwritten: usize,
    pub sentiment_defaulted: usize,
}

/// Filters raw records down to complete, time-ordered points
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer {
    neutral_sentiment: f64,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self { neutral_sentiment: NEUTRAL_SENTIMENT }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl RecordNormalizer {
    pub fn new(neutral_sentiment: f64) -> Self {
        Self { neutral_sentiment }
    }

    pub fn normalize(&self, dataset: &RawDataset) -> Vec<NormalizedPoint> {
        self.normalize_with_report(dataset).0
    }

    /// Duplicates are resolved by `time` before filtering: the later raw
    /// entry replaces the earlier one even when it is incomplete, so the day
    /// may drop out entirely.
    pub fn normalize_with_report(&self, dataset: &RawDataset) -> (Vec<NormalizedPoint>, NormalizationReport) {
        let mut report = NormalizationReport::default();
        let mut by_time: BTreeMap<Timestamp, &RawRecord> = BTreeMap::new();

        for (date, record) in dataset.entries() {
            let Some(seconds) = parse_date_key(date) else {
                report.unparseable_dates += 1;
                crate::log_debug!(LogComponent::Domain("Normalizer"), "skipping unparseable date key '{}'", date);
                continue;
            };
            if by_time.insert(Timestamp::new(seconds), record).is_some() {
                report.overwritten += 1;
            }
        }

        let mut points = Vec::with_capacity(by_time.len());
        for (time, record) in by_time {
            match self.complete_point(time, record, &mut report) {
                Some(point) => points.push(point),
                None => report.incomplete += 1,
            }
        }

        report.kept = points.len();
        crate::log_debug!(
            LogComponent::Domain("Normalizer"),
            "normalized {} of {} records (incomplete: {}, bad dates: {}, overwritten: {})",
            report.kept,
            dataset.len(),
            report.incomplete,
            report.unparseable_dates,
            report.overwritten
        );
        (points, report)
    }

    fn complete_point(&self, time: Timestamp, record: &RawRecord, report: &mut NormalizationReport) -> Option<NormalizedPoint> {
        let stock = record.stock_data.as_ref()?;
        let open = finite(stock.open)?;
        let close = finite(stock.close)?;
        let high = finite(stock.day_high)?;
        let low = finite(stock.day_low)?;
        let sentiment = match finite(record.sentiment_score) {
            Some(score) => score,
            None => {
                report.sentiment_defaulted += 1;
                self.neutral_sentiment
            }
        };
        Some(NormalizedPoint { time, open, high, low, close, sentiment })
    }
}

/// Candle and sentiment series sharing one time key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedSeries {
    pub candles: Vec<CandlePoint>,
    pub sentiment: Vec<SentimentPoint>,
}

pub struct SeriesProjector;

impl SeriesProjector {
    pub fn project(points: &[NormalizedPoint]) -> ProjectedSeries {
        let mut candles = Vec::with_capacity(points.len());
        let mut sentiment = Vec::with_capacity(points.len());
        for p in points {
            candles.push(CandlePoint { time: p.time, open: p.open, high: p.high, low: p.low, close: p.close });
            sentiment.push(SentimentPoint { time: p.time, value: p.sentiment });
        }
        ProjectedSeries { candles, sentiment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::StockData;

    fn full(open: f64, close: f64, high: f64, low: f64, sentiment: Option<f64>) -> RawRecord {
        RawRecord::new(
            Some(StockData { open: Some(open), close: Some(close), day_high: Some(high), day_low: Some(low) }),
            sentiment,
        )
    }

    #[test]
    fn excludes_records_missing_any_price() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-02", full(10.0, 12.0, 13.0, 9.0, Some(0.5)));
        dataset.push(
            "2024-01-03",
            RawRecord::new(Some(StockData { open: Some(1.0), close: Some(1.0), day_high: None, day_low: Some(1.0) }), None),
        );
        dataset.push("2024-01-04", RawRecord::new(None, Some(0.3)));
        dataset.push("2024-01-05", full(1.0, f64::NAN, 1.0, 1.0, None));

        let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
        assert_eq!(points.len(), 1);
        assert_eq!(report.incomplete, 3);
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn sorts_and_defaults_sentiment() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-05", full(5.0, 5.0, 5.0, 5.0, None));
        dataset.push("2024-01-01", full(1.0, 1.0, 1.0, 1.0, Some(f64::INFINITY)));
        dataset.push("2024-01-03", full(3.0, 3.0, 3.0, 3.0, Some(-0.2)));

        let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
        let opens: Vec<f64> = points.iter().map(|p| p.open).collect();
        assert_eq!(opens, vec![1.0, 3.0, 5.0]);
        assert_eq!(points[0].sentiment, NEUTRAL_SENTIMENT);
        assert_eq!(points[1].sentiment, -0.2);
        assert_eq!(report.sentiment_defaulted, 2);
    }

    #[test]
    fn same_day_keys_keep_the_last_entry() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-02", full(1.0, 1.0, 1.0, 1.0, None));
        dataset.push("2024-01-02T12:00:00", full(2.0, 2.0, 2.0, 2.0, None));

        let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].open, 2.0);
        assert_eq!(report.overwritten, 1);
    }

    #[test]
    fn incomplete_later_duplicate_removes_the_day() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-02", full(1.0, 1.0, 1.0, 1.0, Some(0.4)));
        dataset.push(
            "2024-01-02",
            RawRecord::new(Some(StockData { open: Some(1.0), close: None, day_high: Some(1.0), day_low: Some(1.0) }), None),
        );

        let (points, report) = RecordNormalizer::default().normalize_with_report(&dataset);
        assert!(points.is_empty());
        assert_eq!(report.overwritten, 1);
        assert_eq!(report.incomplete, 1);
        assert_eq!(report.sentiment_defaulted, 0);
    }

    #[test]
    fn custom_neutral_value_is_used() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-02", full(1.0, 1.0, 1.0, 1.0, None));
        let points = RecordNormalizer::new(0.5).normalize(&dataset);
        assert_eq!(points[0].sentiment, 0.5);
    }

    #[test]
    fn projection_splits_each_point() {
        let mut dataset = RawDataset::new();
        dataset.push("2024-01-02", full(10.0, 12.0, 13.0, 9.0, Some(0.5)));
        let projected = SeriesProjector::project(&RecordNormalizer::default().normalize(&dataset));
        assert_eq!(projected.candles.len(), 1);
        assert_eq!(projected.candles[0].high, 13.0);
        assert_eq!(projected.sentiment[0].value, 0.5);
        assert_eq!(projected.candles[0].time, projected.sentiment[0].time);
    }
}
