//! The stateful chart surface: one drawing backend, a shared time axis,
//! two value scales and at most one candle and one sentiment series.
//!
//! The surface listens to pointer movement on its container to place the
//! crosshair and forwards every crosshair change to its subscribers. After
//! [`ChartSurface::destroy`] nothing is drawn and every operation is a no-op.

use super::backend::{RenderBackend, TextAlign};
use crate::config::{ChartConfig, LegendStyle};
use crate::domain::chart::{
    CandleSeries, ChartLayout, CrosshairMode, CrosshairMove, LineSeries, PixelPoint, PlotArea, ScalePosition,
    SeriesView, TimeScale, ValueScale, VisibleExtent,
};
use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::domain::sentiment::{CandlePoint, SentimentPoint, Timestamp};
use crate::infrastructure::host::{HostContainer, ListenerHandle, OverlayElement, OverlayRole, OverlaySpec};
use crate::time_utils::format_time_label;
use crate::{log_debug, log_warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const VALUE_TICKS: usize = 5;
const BODY_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Live,
    /// Container had no measurable width; nothing is drawn until a resize
    NeedsLayout,
    Destroyed,
}

type CrosshairHandler = Box<dyn FnMut(&CrosshairMove<'_>)>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Crosshair {
    index: usize,
    pointer: PixelPoint,
}

pub struct ChartSurface {
    container: Rc<dyn HostContainer>,
    backend: Option<Box<dyn RenderBackend>>,
    config: ChartConfig,
    layout: ChartLayout,
    time_scale: TimeScale,
    price_scale: ValueScale,
    sentiment_scale: ValueScale,
    candles: Option<CandleSeries>,
    sentiment: Option<LineSeries>,
    legend: Option<Box<dyn OverlayElement>>,
    crosshair: Option<Crosshair>,
    subscribers: Vec<(SubscriptionId, CrosshairHandler)>,
    next_subscription: u64,
    pointer_listeners: Vec<ListenerHandle>,
    state: SurfaceState,
}

pub type SharedSurface = Rc<RefCell<ChartSurface>>;

impl ChartSurface {
    /// Create the surface inside `container` and start listening to pointer
    /// input. A zero `width` leaves the surface in [`SurfaceState::NeedsLayout`].
    pub fn initialize(
        container: Rc<dyn HostContainer>,
        width: f64,
        height: f64,
        config: ChartConfig,
    ) -> ChartResult<SharedSurface> {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let backend = container.create_backend(width, height)?;
        let layout = ChartLayout::new(width, height);

        let surface = Rc::new(RefCell::new(ChartSurface {
            container: container.clone(),
            backend: Some(backend),
            time_scale: TimeScale::new(),
            price_scale: ValueScale::new(ScalePosition::Right, config.price_scale.margins),
            sentiment_scale: ValueScale::new(ScalePosition::Left, config.sentiment_scale.margins),
            config,
            layout,
            candles: None,
            sentiment: None,
            legend: None,
            crosshair: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            pointer_listeners: Vec::new(),
            state: if width > 0.0 { SurfaceState::Live } else { SurfaceState::NeedsLayout },
        }));

        let listeners = match Self::listen_to_pointer(&container, Rc::downgrade(&surface)) {
            Ok(listeners) => listeners,
            Err(e) => {
                surface.borrow_mut().destroy();
                return Err(e);
            }
        };

        {
            let mut s = surface.borrow_mut();
            s.pointer_listeners = listeners;
            s.price_scale.visible = s.config.price_scale.visible;
            s.sentiment_scale.visible = s.config.sentiment_scale.visible;
            s.apply_layout();
            log_debug!(
                LogComponent::Infrastructure("ChartSurface"),
                "initialized {}x{} ({:?})",
                width,
                height,
                s.state
            );
            s.paint();
        }
        Ok(surface)
    }

    fn listen_to_pointer(
        container: &Rc<dyn HostContainer>,
        surface: Weak<RefCell<ChartSurface>>,
    ) -> ChartResult<Vec<ListenerHandle>> {
        let on_move = surface.clone();
        let move_handle = container.on_pointer_move(Box::new(move |point| {
            if let Some(surface) = on_move.upgrade() {
                surface.borrow_mut().handle_pointer_move(point.x, point.y);
            }
        }))?;
        let leave_handle = container.on_pointer_leave(Box::new(move || {
            if let Some(surface) = surface.upgrade() {
                surface.borrow_mut().handle_pointer_leave();
            }
        }))?;
        Ok(vec![move_handle, leave_handle])
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == SurfaceState::Live
    }

    pub fn needs_layout(&self) -> bool {
        self.state == SurfaceState::NeedsLayout
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == SurfaceState::Destroyed
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn candle_data(&self) -> &[CandlePoint] {
        self.candles.as_ref().map(|s| s.data()).unwrap_or_default()
    }

    pub fn sentiment_data(&self) -> &[SentimentPoint] {
        self.sentiment.as_ref().map(|s| s.data()).unwrap_or_default()
    }

    pub fn has_legend(&self) -> bool {
        self.legend.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn series(&self) -> SeriesView<'_> {
        SeriesView { candles: self.candles.as_ref(), sentiment: self.sentiment.as_ref() }
    }

    /// Replace the candle series data (single slot)
    pub fn install_candle_series(&mut self, points: Vec<CandlePoint>) {
        if self.is_destroyed() {
            return;
        }
        let count = points.len();
        self.candles.get_or_insert_with(CandleSeries::default).set_data(points);
        self.rebuild_scales();
        log_debug!(LogComponent::Infrastructure("ChartSurface"), "candle series installed ({} points)", count);
        self.paint();
    }

    /// Replace the sentiment line data (single slot)
    pub fn install_sentiment_series(&mut self, points: Vec<SentimentPoint>) {
        if self.is_destroyed() {
            return;
        }
        let count = points.len();
        self.sentiment.get_or_insert_with(LineSeries::default).set_data(points);
        self.rebuild_scales();
        log_debug!(LogComponent::Infrastructure("ChartSurface"), "sentiment series installed ({} points)", count);
        self.paint();
    }

    /// Add the colour legend overlay. Calling it again keeps the first one.
    pub fn attach_legend(&mut self) -> ChartResult<()> {
        if self.is_destroyed() || self.legend.is_some() || !self.config.legend.visible {
            return Ok(());
        }
        let spec = OverlaySpec::new(OverlayRole::Legend)
            .style("position", "absolute")
            .style("top", "10px")
            .style("right", "10px")
            .style("background", "rgba(0, 0, 0, 0.5)")
            .style("color", "#fff")
            .style("padding", "5px 10px")
            .style("border-radius", "4px")
            .style("font-size", "12px")
            .html(legend_html(&self.config.legend));
        self.legend = Some(self.container.create_overlay(&spec)?);
        Ok(())
    }

    /// Apply a new container width and fit all bars into it
    pub fn resize(&mut self, width: f64) {
        if self.is_destroyed() {
            return;
        }
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = self.layout.height;
        if let Some(backend) = self.backend.as_mut()
            && let Err(e) = backend.resize(width, height)
        {
            log_warn!(LogComponent::Infrastructure("ChartSurface"), "backend resize failed: {}", e);
        }
        self.layout = ChartLayout::new(width, height);
        self.state = if width > 0.0 { SurfaceState::Live } else { SurfaceState::NeedsLayout };
        self.clear_crosshair();
        self.apply_layout();
        log_debug!(LogComponent::Infrastructure("ChartSurface"), "resized to {} ({:?})", width, self.state);
        self.paint();
    }

    pub fn visible_extent(&self) -> VisibleExtent {
        self.time_scale.visible_extent()
    }

    pub fn subscribe_crosshair_move(&mut self, handler: impl FnMut(&CrosshairMove<'_>) + 'static) -> Option<SubscriptionId> {
        if self.is_destroyed() {
            return None;
        }
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        Some(id)
    }

    /// Returns whether a handler was removed
    pub fn unsubscribe_crosshair_move(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Move the crosshair to the bar nearest `x`.
    ///
    /// Subscribers run while the surface is borrowed and must not call back
    /// into it.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) {
        if !self.is_live() {
            return;
        }
        let pointer = PixelPoint::new(x, y);
        let plot = self.layout.plot_area();
        let crosshair = if plot.contains(pointer) {
            self.time_scale.nearest_index(x).map(|index| Crosshair { index, pointer })
        } else {
            None
        };
        if crosshair == self.crosshair {
            return;
        }
        self.crosshair = crosshair;
        self.dispatch_crosshair();
        self.paint();
    }

    pub fn handle_pointer_leave(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let was_visible = self.crosshair.take().is_some();
        self.dispatch_crosshair();
        if was_visible {
            self.paint();
        }
    }

    /// Drop the crosshair and tell subscribers if one was showing
    fn clear_crosshair(&mut self) {
        if self.crosshair.take().is_some() {
            self.dispatch_crosshair();
        }
    }

    fn dispatch_crosshair(&mut self) {
        let series = SeriesView { candles: self.candles.as_ref(), sentiment: self.sentiment.as_ref() };
        let event = match self.crosshair.and_then(|c| self.time_scale.time_at(c.index).map(|t| (t, c))) {
            Some((time, c)) => CrosshairMove { time: Some(time), point: Some(c.pointer), series },
            None => CrosshairMove::hidden(series),
        };
        for (_, handler) in self.subscribers.iter_mut() {
            handler(&event);
        }
    }

    /// Release the backend, the legend, the series and every subscriber
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.state = SurfaceState::Destroyed;
        self.pointer_listeners.clear();
        self.subscribers.clear();
        if let Some(legend) = self.legend.take() {
            legend.remove();
        }
        if let Some(mut backend) = self.backend.take() {
            backend.release();
        }
        self.candles = None;
        self.sentiment = None;
        self.crosshair = None;
        self.time_scale.set_times(Vec::new());
        self.price_scale.clear();
        self.sentiment_scale.clear();
        log_debug!(LogComponent::Infrastructure("ChartSurface"), "destroyed");
    }

    fn apply_layout(&mut self) {
        let plot = self.layout.plot_area();
        self.time_scale.set_plot(&plot);
        self.price_scale.set_plot(&plot);
        self.sentiment_scale.set_plot(&plot);
        self.time_scale.fit_content();
    }

    fn rebuild_scales(&mut self) {
        let mut times: Vec<Timestamp> = Vec::new();
        if let Some(candles) = &self.candles {
            times.extend(candles.times());
        }
        self.time_scale.set_times(times);
        if let Some(sentiment) = &self.sentiment {
            self.time_scale.merge_times(sentiment.times());
        }
        self.clear_crosshair();
        self.apply_layout();

        match &self.candles {
            Some(candles) => self.price_scale.autoscale(candles.extremes()),
            None => self.price_scale.clear(),
        }
        match &self.sentiment {
            Some(sentiment) => self.sentiment_scale.autoscale(sentiment.values()),
            None => self.sentiment_scale.clear(),
        }
    }

    fn paint(&mut self) {
        if !self.is_live() {
            return;
        }
        let Some(mut backend) = self.backend.take() else {
            return;
        };
        let result = self.draw(backend.as_mut());
        self.backend = Some(backend);
        if let Err(e) = result {
            log_warn!(LogComponent::Infrastructure("ChartSurface"), "paint failed: {}", e);
        }
    }

    fn draw(&self, backend: &mut dyn RenderBackend) -> ChartResult<()> {
        let plot = self.layout.plot_area();
        backend.begin_frame(&self.config.layout.background)?;
        backend.set_font(&self.config.layout.font);
        self.draw_grid(backend, &plot);
        self.draw_candles(backend);
        self.draw_sentiment(backend);
        self.draw_axes(backend, &plot);
        self.draw_crosshair(backend, &plot);
        backend.end_frame()
    }

    fn draw_grid(&self, backend: &mut dyn RenderBackend, plot: &PlotArea) {
        for index in self.time_scale.label_indices() {
            let x = self.time_scale.index_to_x(index);
            backend.line(
                PixelPoint::new(x, plot.top),
                PixelPoint::new(x, plot.bottom()),
                &self.config.grid.vert_lines,
                1.0,
            );
        }
        for value in self.price_scale.ticks(VALUE_TICKS) {
            if let Some(y) = self.price_scale.value_to_y(value) {
                backend.line(
                    PixelPoint::new(plot.left, y),
                    PixelPoint::new(plot.right(), y),
                    &self.config.grid.horz_lines,
                    1.0,
                );
            }
        }
    }

    fn draw_candles(&self, backend: &mut dyn RenderBackend) {
        let Some(candles) = &self.candles else {
            return;
        };
        let style = &self.config.candles;
        let body_width = (self.time_scale.bar_spacing() * BODY_WIDTH_RATIO).max(1.0);
        for candle in candles.data() {
            let Some(x) = self.time_scale.time_to_x(candle.time) else {
                continue;
            };
            let (Some(high_y), Some(low_y), Some(open_y), Some(close_y)) = (
                self.price_scale.value_to_y(candle.high),
                self.price_scale.value_to_y(candle.low),
                self.price_scale.value_to_y(candle.open),
                self.price_scale.value_to_y(candle.close),
            ) else {
                continue;
            };
            let (body, wick) = if candle.is_bullish() {
                (&style.up_color, &style.wick_up_color)
            } else {
                (&style.down_color, &style.wick_down_color)
            };
            backend.line(PixelPoint::new(x, high_y), PixelPoint::new(x, low_y), wick, 1.0);

            let top = open_y.min(close_y);
            let height = (open_y - close_y).abs().max(1.0);
            backend.fill_rect(x - body_width / 2.0, top, body_width, height, body);
            if style.border_visible {
                backend.stroke_rect(x - body_width / 2.0, top, body_width, height, body, 1.0);
            }
        }
    }

    fn draw_sentiment(&self, backend: &mut dyn RenderBackend) {
        let Some(sentiment) = &self.sentiment else {
            return;
        };
        let style = &self.config.sentiment_line;
        let points: Vec<PixelPoint> = sentiment
            .data()
            .iter()
            .filter_map(|p| {
                let x = self.time_scale.time_to_x(p.time)?;
                let y = self.sentiment_scale.value_to_y(p.value)?;
                Some(PixelPoint::new(x, y))
            })
            .collect();
        backend.polyline(&points, &style.color, style.width);

        if style.crosshair_marker_visible
            && let Some(time) = self.crosshair.and_then(|c| self.time_scale.time_at(c.index))
            && let Some(point) = sentiment.find(time)
            && let (Some(x), Some(y)) =
                (self.time_scale.time_to_x(time), self.sentiment_scale.value_to_y(point.value))
        {
            backend.circle(PixelPoint::new(x, y), style.crosshair_marker_radius, &style.color);
        }
    }

    fn draw_axes(&self, backend: &mut dyn RenderBackend, plot: &PlotArea) {
        let text = &self.config.layout.text_color;

        if self.config.time_scale.time_visible {
            backend.line(
                PixelPoint::new(plot.left, plot.bottom()),
                PixelPoint::new(plot.right(), plot.bottom()),
                &self.config.time_scale.border_color,
                1.0,
            );
            let interval = self.time_scale.bar_interval_secs();
            let label_y = plot.bottom() + self.layout.time_axis_height / 2.0;
            for index in self.time_scale.label_indices() {
                if let Some(time) = self.time_scale.time_at(index) {
                    let x = self.time_scale.index_to_x(index);
                    backend.text(&format_time_label(time.value(), interval), PixelPoint::new(x, label_y), text, TextAlign::Center);
                }
            }
        }

        if self.price_scale.visible {
            draw_value_axis(backend, plot, &self.price_scale, &self.config.price_scale.border_color, text);
        }

        if self.sentiment_scale.visible {
            draw_value_axis(backend, plot, &self.sentiment_scale, &self.config.sentiment_scale.border_color, text);
            let style = &self.config.sentiment_line;
            if style.last_value_visible
                && let Some(last) = self.sentiment.as_ref().and_then(|s| s.last())
                && let Some(y) = self.sentiment_scale.value_to_y(last.value)
            {
                let gutter = self.layout.left_axis_width;
                backend.fill_rect(0.0, y - 8.0, gutter - 2.0, 16.0, &style.color);
                backend.text(
                    &format!("{:.2}", last.value),
                    PixelPoint::new(gutter - 6.0, y),
                    &self.config.layout.background,
                    TextAlign::Right,
                );
            }
        }
    }

    fn draw_crosshair(&self, backend: &mut dyn RenderBackend, plot: &PlotArea) {
        let Some(crosshair) = self.crosshair else {
            return;
        };
        let Some(time) = self.time_scale.time_at(crosshair.index) else {
            return;
        };
        let style = &self.config.crosshair;
        let x = self.time_scale.index_to_x(crosshair.index);
        let y = match style.mode {
            CrosshairMode::Normal => crosshair.pointer.y,
            CrosshairMode::Magnet => self
                .candles
                .as_ref()
                .and_then(|c| c.find(time))
                .and_then(|c| self.price_scale.value_to_y(c.close))
                .unwrap_or(crosshair.pointer.y),
        };

        backend.line(PixelPoint::new(x, plot.top), PixelPoint::new(x, plot.bottom()), &style.color, style.width);
        backend.line(PixelPoint::new(plot.left, y), PixelPoint::new(plot.right(), y), &style.color, style.width);

        let text = &self.config.layout.text_color;
        let label_y = plot.bottom() + self.layout.time_axis_height / 2.0;
        backend.fill_rect(x - 40.0, plot.bottom() + 2.0, 80.0, self.layout.time_axis_height - 4.0, &style.label_background);
        backend.text(
            &format_time_label(time.value(), self.time_scale.bar_interval_secs()),
            PixelPoint::new(x, label_y),
            text,
            TextAlign::Center,
        );
        if let Some(price) = self.price_scale.y_to_value(y) {
            backend.fill_rect(plot.right(), y - 8.0, self.layout.right_axis_width, 16.0, &style.label_background);
            backend.text(&format!("{:.2}", price), PixelPoint::new(plot.right() + 6.0, y), text, TextAlign::Left);
        }
    }
}

impl Drop for ChartSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Axis line on the scale's plot edge with tick labels outside it
fn draw_value_axis(backend: &mut dyn RenderBackend, plot: &PlotArea, scale: &ValueScale, border: &str, text: &str) {
    let edge = scale.edge_x(plot);
    backend.line(PixelPoint::new(edge, plot.top), PixelPoint::new(edge, plot.bottom()), border, 1.0);
    let (label_x, align) = match scale.position {
        ScalePosition::Left => (edge - 6.0, TextAlign::Right),
        ScalePosition::Right => (edge + 6.0, TextAlign::Left),
    };
    for value in scale.ticks(VALUE_TICKS) {
        if let Some(y) = scale.value_to_y(value) {
            backend.text(&format!("{:.2}", value), PixelPoint::new(label_x, y), text, align);
        }
    }
}

fn legend_html(style: &LegendStyle) -> String {
    format!(
        "<span style=\"display: inline-block; width: 12px; height: 12px; background: {}; margin-right: 5px;\"></span>Candlestick\
         <span style=\"display: inline-block; width: 12px; height: 12px; background: {}; margin: 0 5px 0 15px;\"></span>Sentiment",
        style.candle_swatch, style.sentiment_swatch
    )
}
