use crate::domain::chart::PixelPoint;
use crate::domain::errors::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
    Center,
}

impl TextAlign {
    pub fn as_canvas_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Right => "right",
            TextAlign::Center => "center",
        }
    }
}

/// Immediate-mode drawing target for one chart surface.
///
/// Coordinates are CSS pixels relative to the surface's top-left corner.
/// A frame is everything between `begin_frame` and `end_frame`; drawing
/// outside a frame is allowed but not required to be visible.
pub trait RenderBackend {
    /// Resize the native surface. Clears its content.
    fn resize(&mut self, width: f64, height: f64) -> ChartResult<()>;

    fn begin_frame(&mut self, background: &str) -> ChartResult<()>;

    fn set_font(&mut self, font: &str);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64);

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: &str, line_width: f64);

    fn polyline(&mut self, points: &[PixelPoint], color: &str, line_width: f64);

    fn circle(&mut self, center: PixelPoint, radius: f64, color: &str);

    fn text(&mut self, text: &str, at: PixelPoint, color: &str, align: TextAlign);

    fn end_frame(&mut self) -> ChartResult<()>;

    /// Detach the native surface from its host. Later calls are no-ops.
    fn release(&mut self);
}
