use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Pixel coordinates relative to the chart container's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Side of the plot a value scale is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePosition {
    #[display(fmt = "left")]
    Left,
    #[display(fmt = "right")]
    Right,
}

/// Fractions of the plot height kept free above and below a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl ScaleMargins {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top: top.clamp(0.0, 0.9), bottom: bottom.clamp(0.0, 0.9) }
    }

    /// Fraction of the plot height left for data
    pub fn usable(&self) -> f64 {
        (1.0 - self.top - self.bottom).max(0.05)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrosshairMode {
    /// Horizontal line follows the pointer, vertical line snaps to the bar
    #[display(fmt = "normal")]
    Normal,
    /// Both lines snap to the hovered bar's close
    #[display(fmt = "magnet")]
    Magnet,
}

/// Rectangle of the plotting region inside the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

/// Canvas dimensions and the axis gutters around the plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub left_axis_width: f64,
    pub right_axis_width: f64,
    pub time_axis_height: f64,
}

impl ChartLayout {
    pub const LEFT_AXIS_WIDTH: f64 = 56.0;
    pub const RIGHT_AXIS_WIDTH: f64 = 64.0;
    pub const TIME_AXIS_HEIGHT: f64 = 28.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            left_axis_width: Self::LEFT_AXIS_WIDTH,
            right_axis_width: Self::RIGHT_AXIS_WIDTH,
            time_axis_height: Self::TIME_AXIS_HEIGHT,
        }
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.left_axis_width,
            top: 0.0,
            width: (self.width - self.left_axis_width - self.right_axis_width).max(0.0),
            height: (self.height - self.time_axis_height).max(0.0),
        }
    }
}
