//! Chart configuration. Defaults reproduce the dashboard's dark theme; a
//! host may override any subset through JSON.

use crate::domain::chart::{CrosshairMode, ScaleMargins};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::sentiment::NEUTRAL_SENTIMENT;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    pub background: String,
    pub text_color: String,
    pub font: String,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            background: "rgba(17, 24, 39, 1)".into(),
            text_color: "white".into(),
            font: "12px sans-serif".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub vert_lines: String,
    pub horz_lines: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            vert_lines: "rgba(255, 255, 255, 0.1)".into(),
            horz_lines: "rgba(255, 255, 255, 0.1)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosshairStyle {
    pub mode: CrosshairMode,
    pub color: String,
    pub width: f64,
    pub label_background: String,
}

impl Default for CrosshairStyle {
    fn default() -> Self {
        Self {
            mode: CrosshairMode::Normal,
            color: "#758696".into(),
            width: 1.0,
            label_background: "#1e293f".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeScaleStyle {
    pub border_color: String,
    pub time_visible: bool,
}

impl Default for TimeScaleStyle {
    fn default() -> Self {
        Self { border_color: "rgba(255, 255, 255, 0.2)".into(), time_visible: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueScaleStyle {
    pub margins: ScaleMargins,
    pub border_color: String,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl ValueScaleStyle {
    pub fn price() -> Self {
        Self { margins: ScaleMargins::new(0.1, 0.1), border_color: "rgba(255, 255, 255, 0.2)".into(), visible: true }
    }

    pub fn sentiment() -> Self {
        Self { margins: ScaleMargins::new(0.3, 0.25), border_color: "rgba(255, 165, 0, 0.8)".into(), visible: true }
    }
}

/// Fields a host supplied for one value scale, layered over that scale's
/// own defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValueScalePatch {
    margins: Option<ScaleMargins>,
    border_color: Option<String>,
    visible: Option<bool>,
}

impl ValueScalePatch {
    fn apply(self, base: ValueScaleStyle) -> ValueScaleStyle {
        ValueScaleStyle {
            margins: self.margins.unwrap_or(base.margins),
            border_color: self.border_color.unwrap_or(base.border_color),
            visible: self.visible.unwrap_or(base.visible),
        }
    }
}

fn price_scale_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ValueScaleStyle, D::Error> {
    ValueScalePatch::deserialize(deserializer).map(|patch| patch.apply(ValueScaleStyle::price()))
}

fn sentiment_scale_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ValueScaleStyle, D::Error> {
    ValueScalePatch::deserialize(deserializer).map(|patch| patch.apply(ValueScaleStyle::sentiment()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleStyle {
    pub up_color: String,
    pub down_color: String,
    pub wick_up_color: String,
    pub wick_down_color: String,
    pub border_visible: bool,
}

impl Default for CandleStyle {
    fn default() -> Self {
        Self {
            up_color: "#22c55e".into(),
            down_color: "#ef4444".into(),
            wick_up_color: "#22c55e".into(),
            wick_down_color: "#ef4444".into(),
            border_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentLineStyle {
    pub color: String,
    pub width: f64,
    pub crosshair_marker_visible: bool,
    pub crosshair_marker_radius: f64,
    pub last_value_visible: bool,
}

impl Default for SentimentLineStyle {
    fn default() -> Self {
        Self {
            color: "rgb(194, 194, 194)".into(),
            width: 2.0,
            crosshair_marker_visible: true,
            crosshair_marker_radius: 4.0,
            last_value_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipStyle {
    pub offset_x: f64,
    pub offset_y: f64,
    pub background: String,
    pub text_color: String,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            offset_x: 15.0,
            offset_y: 15.0,
            background: "rgba(0, 0, 0, 0.8)".into(),
            text_color: "#fff".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub visible: bool,
    pub candle_swatch: String,
    pub sentiment_swatch: String,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            visible: true,
            candle_swatch: "#22c55e".into(),
            sentiment_swatch: "rgb(255, 165, 0)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub height: f64,
    pub layout: LayoutStyle,
    pub grid: GridStyle,
    pub crosshair: CrosshairStyle,
    pub time_scale: TimeScaleStyle,
    #[serde(deserialize_with = "price_scale_style")]
    pub price_scale: ValueScaleStyle,
    #[serde(deserialize_with = "sentiment_scale_style")]
    pub sentiment_scale: ValueScaleStyle,
    pub candles: CandleStyle,
    pub sentiment_line: SentimentLineStyle,
    pub tooltip: TooltipStyle,
    pub legend: LegendStyle,
    pub neutral_sentiment: f64,
    pub signal_threshold: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 400.0,
            layout: LayoutStyle::default(),
            grid: GridStyle::default(),
            crosshair: CrosshairStyle::default(),
            time_scale: TimeScaleStyle::default(),
            price_scale: ValueScaleStyle::price(),
            sentiment_scale: ValueScaleStyle::sentiment(),
            candles: CandleStyle::default(),
            sentiment_line: SentimentLineStyle::default(),
            tooltip: TooltipStyle::default(),
            legend: LegendStyle::default(),
            neutral_sentiment: NEUTRAL_SENTIMENT,
            signal_threshold: 0.1,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: ChartConfig = serde_json::from_str(json).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ChartError::Config(format!("height must be positive, got {}", self.height)));
        }
        if !self.signal_threshold.is_finite() || self.signal_threshold < 0.0 {
            return Err(ChartError::Config(format!(
                "signal_threshold must be non-negative, got {}",
                self.signal_threshold
            )));
        }
        if !self.neutral_sentiment.is_finite() {
            return Err(ChartError::Config("neutral_sentiment must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_theme() {
        let config = ChartConfig::default();
        assert_eq!(config.height, 400.0);
        assert_eq!(config.price_scale.margins, ScaleMargins::new(0.1, 0.1));
        assert_eq!(config.sentiment_scale.margins, ScaleMargins::new(0.3, 0.25));
        assert_eq!(config.crosshair.label_background, "#1e293f");
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = ChartConfig::from_json(r#"{"height": 300, "candles": {"up_color": "lime"}}"#).unwrap();
        assert_eq!(config.height, 300.0);
        assert_eq!(config.candles.up_color, "lime");
        assert_eq!(config.candles.down_color, "#ef4444");
        assert_eq!(config.tooltip.offset_x, 15.0);
    }

    #[test]
    fn partial_scale_override_keeps_that_scales_defaults() {
        let config =
            ChartConfig::from_json(r#"{"price_scale": {"visible": false}, "sentiment_scale": {"border_color": "red"}}"#)
                .unwrap();
        assert!(!config.price_scale.visible);
        assert_eq!(config.price_scale.margins, ScaleMargins::new(0.1, 0.1));
        assert_eq!(config.sentiment_scale.border_color, "red");
        assert_eq!(config.sentiment_scale.margins, ScaleMargins::new(0.3, 0.25));
        assert!(config.sentiment_scale.visible);
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(ChartConfig::from_json(r#"{"height": 0}"#), Err(ChartError::Config(_))));
        assert!(matches!(ChartConfig::from_json(r#"{"signal_threshold": -1}"#), Err(ChartError::Config(_))));
        assert!(matches!(ChartConfig::from_json("not json"), Err(ChartError::Config(_))));
    }
}
