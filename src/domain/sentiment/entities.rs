use super::value_objects::Timestamp;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Price block of one dataset date. Every field may be absent or null; the
/// backend also sends `{ "error": "..." }` in place of prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockData {
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
}

/// One dataset date as delivered by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRecord {
    pub stock_data: Option<StockData>,
    pub sentiment_score: Option<f64>,
}

/// Numbers arrive as JSON numbers or numeric strings; anything else is absent.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl StockData {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            open: lenient_number(obj.get("Open")),
            close: lenient_number(obj.get("Close")),
            day_high: lenient_number(obj.get("maxDay")),
            day_low: lenient_number(obj.get("minDay")),
        })
    }
}

impl RawRecord {
    pub fn new(stock_data: Option<StockData>, sentiment_score: Option<f64>) -> Self {
        Self { stock_data, sentiment_score }
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            stock_data: value.get("stock_data").and_then(StockData::from_value),
            sentiment_score: lenient_number(value.get("sentiment_score")),
        }
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(RawRecord::from_value(&value))
    }
}

/// Date-keyed records in document order. A key repeated in the source stays
/// as a separate, later entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    entries: Vec<(String, RawRecord)>,
}

impl RawDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: impl Into<String>, record: RawRecord) {
        self.entries.push((date.into(), record));
    }

    pub fn entries(&self) -> &[(String, RawRecord)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, RawRecord)> for RawDataset {
    fn from_iter<I: IntoIterator<Item = (String, RawRecord)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

struct DatasetVisitor;

impl<'de> Visitor<'de> for DatasetVisitor {
    type Value = RawDataset;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by date")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut dataset = RawDataset::new();
        while let Some((date, record)) = map.next_entry::<String, RawRecord>()? {
            dataset.push(date, record);
        }
        Ok(dataset)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(RawDataset::new())
    }
}

impl<'de> Deserialize<'de> for RawDataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DatasetVisitor)
    }
}

/// A dataset date with complete, finite prices and a sentiment value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandlePoint {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandlePoint {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentPoint {
    pub time: Timestamp,
    pub value: f64,
}
