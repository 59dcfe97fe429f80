use super::value_objects::{PlotArea, ScaleMargins, ScalePosition};
use crate::domain::sentiment::{CandlePoint, SentimentPoint, Timestamp};

/// Bar spacing used before a surface has a measurable width
pub const DEFAULT_BAR_SPACING: f64 = 6.0;
/// Minimum horizontal distance between two time-axis labels
const MIN_LABEL_SPACING_PX: f64 = 80.0;

/// Visible part of the time axis, used to compare fits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleExtent {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub bar_spacing: f64,
    pub plot_width: f64,
}

/// Shared time axis. Bars are indexed by position in the sorted time list
/// and laid out at equal spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    times: Vec<Timestamp>,
    plot_left: f64,
    plot_width: f64,
    bar_spacing: f64,
    /// Index of the leftmost visible bar
    first_visible: usize,
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeScale {
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            plot_left: 0.0,
            plot_width: 0.0,
            bar_spacing: DEFAULT_BAR_SPACING,
            first_visible: 0,
        }
    }

    /// Replace the bar times. `times` must be sorted ascending.
    pub fn set_times(&mut self, times: Vec<Timestamp>) {
        self.times = times;
        self.first_visible = 0;
    }

    /// Merge times from another series, keeping order and uniqueness
    pub fn merge_times(&mut self, times: impl IntoIterator<Item = Timestamp>) {
        self.times.extend(times);
        self.times.sort_unstable();
        self.times.dedup();
        self.first_visible = 0;
    }

    pub fn set_plot(&mut self, area: &PlotArea) {
        self.plot_left = area.left;
        self.plot_width = area.width;
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    /// Spread all bars across the plot width
    pub fn fit_content(&mut self) {
        self.first_visible = 0;
        if self.times.is_empty() || self.plot_width <= 0.0 {
            self.bar_spacing = DEFAULT_BAR_SPACING;
            return;
        }
        self.bar_spacing = self.plot_width / self.times.len() as f64;
    }

    pub fn index_to_x(&self, index: usize) -> f64 {
        let logical = index as f64 - self.first_visible as f64;
        self.plot_left + (logical + 0.5) * self.bar_spacing
    }

    pub fn time_to_x(&self, time: Timestamp) -> Option<f64> {
        self.index_of(time).map(|i| self.index_to_x(i))
    }

    pub fn index_of(&self, time: Timestamp) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    pub fn time_at(&self, index: usize) -> Option<Timestamp> {
        self.times.get(index).copied()
    }

    /// Nearest bar to a horizontal pixel position inside the plot
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        if self.times.is_empty() || self.plot_width <= 0.0 {
            return None;
        }
        if x < self.plot_left || x > self.plot_left + self.plot_width {
            return None;
        }
        let logical = ((x - self.plot_left) / self.bar_spacing - 0.5).round();
        let index = (logical.max(0.0) as usize + self.first_visible).min(self.times.len() - 1);
        Some(index)
    }

    pub fn visible_extent(&self) -> VisibleExtent {
        let visible = if self.bar_spacing > 0.0 {
            (self.plot_width / self.bar_spacing).round() as usize
        } else {
            0
        };
        let last = (self.first_visible + visible.max(1)).min(self.times.len()).saturating_sub(1);
        VisibleExtent {
            from: self.time_at(self.first_visible),
            to: self.time_at(last),
            bar_spacing: self.bar_spacing,
            plot_width: self.plot_width,
        }
    }

    /// Smallest gap between consecutive bars (0 with fewer than two bars)
    pub fn bar_interval_secs(&self) -> i64 {
        self.times
            .windows(2)
            .map(|w| w[1].value() - w[0].value())
            .min()
            .unwrap_or(0)
    }

    /// Indices that get a time label, spaced so labels do not overlap
    pub fn label_indices(&self) -> Vec<usize> {
        if self.times.is_empty() || self.bar_spacing <= 0.0 {
            return Vec::new();
        }
        let step = (MIN_LABEL_SPACING_PX / self.bar_spacing).ceil().max(1.0) as usize;
        (self.first_visible..self.times.len()).step_by(step).collect()
    }
}

/// Independent vertical scale for one group of series
#[derive(Debug, Clone, PartialEq)]
pub struct ValueScale {
    pub position: ScalePosition,
    pub margins: ScaleMargins,
    pub visible: bool,
    range: Option<(f64, f64)>,
    top: f64,
    height: f64,
}

impl ValueScale {
    pub fn new(position: ScalePosition, margins: ScaleMargins) -> Self {
        Self { position, margins, visible: true, range: None, top: 0.0, height: 0.0 }
    }

    pub fn set_plot(&mut self, area: &PlotArea) {
        self.top = area.top;
        self.height = area.height;
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Plot edge the axis line sits on
    pub fn edge_x(&self, area: &PlotArea) -> f64 {
        match self.position {
            ScalePosition::Left => area.left,
            ScalePosition::Right => area.right(),
        }
    }

    /// Autoscale to the given values. A flat range is padded so the series
    /// sits in the middle of its band.
    pub fn autoscale(&mut self, values: impl IntoIterator<Item = f64>) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            self.range = None;
            return;
        }
        if (max - min).abs() < f64::EPSILON {
            let pad = if min.abs() > f64::EPSILON { min.abs() * 0.01 } else { 0.5 };
            min -= pad;
            max += pad;
        }
        self.range = Some((min, max));
    }

    pub fn clear(&mut self) {
        self.range = None;
    }

    fn band(&self) -> (f64, f64) {
        let band_top = self.top + self.height * self.margins.top;
        let band_height = self.height * self.margins.usable();
        (band_top, band_height)
    }

    pub fn value_to_y(&self, value: f64) -> Option<f64> {
        let (min, max) = self.range?;
        let (band_top, band_height) = self.band();
        let normalized = (value - min) / (max - min);
        Some(band_top + band_height * (1.0 - normalized))
    }

    pub fn y_to_value(&self, y: f64) -> Option<f64> {
        let (min, max) = self.range?;
        let (band_top, band_height) = self.band();
        if band_height <= 0.0 {
            return None;
        }
        let normalized = 1.0 - (y - band_top) / band_height;
        Some(min + (max - min) * normalized)
    }

    /// Evenly spaced label values across the data range
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let Some((min, max)) = self.range else {
            return Vec::new();
        };
        if count < 2 {
            return vec![min];
        }
        let step = (max - min) / (count - 1) as f64;
        (0..count).map(|i| min + step * i as f64).collect()
    }
}

/// Candle series storage, sorted by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    data: Vec<CandlePoint>,
}

impl CandleSeries {
    /// Replace all data; input is re-sorted and deduplicated by time
    pub fn set_data(&mut self, mut points: Vec<CandlePoint>) {
        points.sort_by_key(|p| p.time);
        points.dedup_by_key(|p| p.time);
        self.data = points;
    }

    pub fn data(&self) -> &[CandlePoint] {
        &self.data
    }

    pub fn find(&self, time: Timestamp) -> Option<&CandlePoint> {
        self.data.binary_search_by_key(&time, |p| p.time).ok().map(|i| &self.data[i])
    }

    pub fn times(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.data.iter().map(|p| p.time)
    }

    /// (low, high) of every candle, for autoscaling
    pub fn extremes(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|p| [p.low, p.high])
    }
}

/// Scalar line series storage, sorted by time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSeries {
    data: Vec<SentimentPoint>,
}

impl LineSeries {
    pub fn set_data(&mut self, mut points: Vec<SentimentPoint>) {
        points.sort_by_key(|p| p.time);
        points.dedup_by_key(|p| p.time);
        self.data = points;
    }

    pub fn data(&self) -> &[SentimentPoint] {
        &self.data
    }

    pub fn find(&self, time: Timestamp) -> Option<&SentimentPoint> {
        self.data.binary_search_by_key(&time, |p| p.time).ok().map(|i| &self.data[i])
    }

    pub fn last(&self) -> Option<&SentimentPoint> {
        self.data.last()
    }

    pub fn times(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.data.iter().map(|p| p.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|p| p.value)
    }
}

/// Read-only view of the installed series handed to crosshair subscribers
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesView<'a> {
    pub candles: Option<&'a CandleSeries>,
    pub sentiment: Option<&'a LineSeries>,
}

impl<'a> SeriesView<'a> {
    pub fn candle_at(&self, time: Timestamp) -> Option<&'a CandlePoint> {
        self.candles?.find(time)
    }

    pub fn sentiment_at(&self, time: Timestamp) -> Option<&'a SentimentPoint> {
        self.sentiment?.find(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(n: i64) -> Vec<Timestamp> {
        (0..n).map(|i| Timestamp::new(i * 86_400)).collect()
    }

    fn area(width: f64) -> PlotArea {
        PlotArea { left: 50.0, top: 0.0, width, height: 300.0 }
    }

    #[test]
    fn fit_content_spreads_bars_over_plot() {
        let mut scale = TimeScale::new();
        scale.set_times(times(10));
        scale.set_plot(&area(500.0));
        scale.fit_content();
        assert_eq!(scale.bar_spacing(), 50.0);
        assert_eq!(scale.index_to_x(0), 75.0);
        assert_eq!(scale.index_to_x(9), 525.0);
        let extent = scale.visible_extent();
        assert_eq!(extent.from, Some(Timestamp::new(0)));
        assert_eq!(extent.to, Some(Timestamp::new(9 * 86_400)));
    }

    #[test]
    fn nearest_index_snaps_and_rejects_outside() {
        let mut scale = TimeScale::new();
        scale.set_times(times(4));
        scale.set_plot(&area(400.0));
        scale.fit_content();
        assert_eq!(scale.nearest_index(60.0), Some(0));
        assert_eq!(scale.nearest_index(249.0), Some(1));
        assert_eq!(scale.nearest_index(449.0), Some(3));
        assert_eq!(scale.nearest_index(10.0), None);
        assert_eq!(scale.nearest_index(451.0), None);
    }

    #[test]
    fn merge_times_dedups() {
        let mut scale = TimeScale::new();
        scale.set_times(vec![Timestamp::new(2), Timestamp::new(4)]);
        scale.merge_times(vec![Timestamp::new(1), Timestamp::new(4)]);
        assert_eq!(scale.len(), 3);
        assert_eq!(scale.index_of(Timestamp::new(4)), Some(2));
    }

    #[test]
    fn value_scale_honours_margins() {
        let mut scale = ValueScale::new(ScalePosition::Left, ScaleMargins::new(0.3, 0.25));
        scale.set_plot(&area(400.0));
        scale.autoscale([-1.0, 1.0]);
        assert!((scale.value_to_y(1.0).unwrap() - 90.0).abs() < 1e-9);
        assert!((scale.value_to_y(-1.0).unwrap() - 225.0).abs() < 1e-9);
        assert!((scale.y_to_value(90.0).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn axis_edge_follows_position() {
        let plot = area(400.0);
        let left = ValueScale::new(ScalePosition::Left, ScaleMargins::new(0.1, 0.1));
        let right = ValueScale::new(ScalePosition::Right, ScaleMargins::new(0.1, 0.1));
        assert_eq!(left.edge_x(&plot), plot.left);
        assert_eq!(right.edge_x(&plot), plot.right());
    }

    #[test]
    fn flat_range_is_padded() {
        let mut scale = ValueScale::new(ScalePosition::Right, ScaleMargins::new(0.1, 0.1));
        scale.autoscale([0.0, 0.0]);
        assert_eq!(scale.range(), Some((-0.5, 0.5)));
        scale.autoscale(std::iter::empty());
        assert_eq!(scale.range(), None);
    }

    #[test]
    fn series_find_is_exact() {
        let mut series = LineSeries::default();
        series.set_data(vec![
            SentimentPoint { time: Timestamp::new(20), value: 0.2 },
            SentimentPoint { time: Timestamp::new(10), value: 0.1 },
        ]);
        assert_eq!(series.find(Timestamp::new(10)).map(|p| p.value), Some(0.1));
        assert!(series.find(Timestamp::new(15)).is_none());
        assert_eq!(series.last().map(|p| p.value), Some(0.2));
    }
}
