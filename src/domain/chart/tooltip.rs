use crate::domain::sentiment::{CandlePoint, SentimentPoint, SignalKind, Timestamp};
use crate::time_utils::format_date;

/// Values shown for one hovered date
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub time: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sentiment: f64,
    pub signal: SignalKind,
}

impl TooltipContent {
    pub fn new(candle: &CandlePoint, sentiment: &SentimentPoint, signal_threshold: f64) -> Self {
        Self {
            time: candle.time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            sentiment: sentiment.value,
            signal: SignalKind::classify(sentiment.value, signal_threshold),
        }
    }

    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Date", format_date(self.time.value())),
            ("Open", self.open.to_string()),
            ("High", self.high.to_string()),
            ("Low", self.low.to_string()),
            ("Close", self.close.to_string()),
            ("Sentiment", self.sentiment.to_string()),
            ("Signal", self.signal.to_string()),
        ]
    }

    pub fn to_html(&self) -> String {
        self.rows()
            .into_iter()
            .map(|(label, value)| format!("<div><strong>{}:</strong> {}</div>", label, value))
            .collect()
    }
}
