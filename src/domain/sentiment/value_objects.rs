use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Epoch seconds at 00:00 UTC of a dataset date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Trading signal derived from a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SignalKind {
    #[display(fmt = "BUY")]
    Buy,
    #[display(fmt = "SELL")]
    Sell,
    #[display(fmt = "HOLD")]
    Hold,
}

impl SignalKind {
    /// Above `threshold` is a buy, below `-threshold` a sell, anything in
    /// between (inclusive) a hold.
    pub fn classify(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SignalKind::Buy
        } else if score < -threshold {
            SignalKind::Sell
        } else {
            SignalKind::Hold
        }
    }
}
