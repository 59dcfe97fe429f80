use super::backend::{RenderBackend, TextAlign};
use crate::domain::chart::PixelPoint;
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::{LogComponent, get_logger};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

/// Canvas 2D backend. Owns one `<canvas>` appended to the chart container.
pub struct CanvasBackend {
    canvas: Option<HtmlCanvasElement>,
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasBackend {
    /// Create a canvas inside `parent` sized to `width` x `height`
    pub fn create(document: &Document, parent: &HtmlElement, width: f64, height: f64) -> ChartResult<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| ChartError::dom("create canvas", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Dom("created element is not a canvas".into()))?;
        canvas
            .style()
            .set_property("display", "block")
            .map_err(|e| ChartError::dom("style canvas", e))?;
        parent
            .append_child(&canvas)
            .map_err(|e| ChartError::dom("append canvas", e))?;

        let context = canvas
            .get_context("2d")
            .map_err(|e| ChartError::dom("get 2d context", e))?
            .ok_or_else(|| ChartError::Rendering("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ChartError::Rendering("failed to cast to 2d context".into()))?;

        let mut backend = Self { canvas: Some(canvas), context, width: 0.0, height: 0.0 };
        backend.resize(width, height)?;

        get_logger().debug(
            LogComponent::Infrastructure("CanvasBackend"),
            &format!("canvas created {}x{}", width, height),
        );
        Ok(backend)
    }

    fn set_stroke(&self, color: &str, line_width: f64) {
        self.context.set_stroke_style_str(color);
        self.context.set_line_width(line_width);
    }

    fn set_fill(&self, color: &str) {
        self.context.set_fill_style_str(color);
    }
}

impl RenderBackend for CanvasBackend {
    fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let Some(canvas) = &self.canvas else {
            return Ok(());
        };
        canvas.set_width(width.max(0.0).round() as u32);
        canvas.set_height(height.max(0.0).round() as u32);
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn begin_frame(&mut self, background: &str) -> ChartResult<()> {
        if self.canvas.is_none() {
            return Err(ChartError::SurfaceDestroyed);
        }
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
        self.set_fill(background);
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.context.set_font(font);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_fill(color);
        self.context.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64) {
        self.set_stroke(color, line_width);
        self.context.stroke_rect(x, y, width, height);
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: &str, line_width: f64) {
        self.set_stroke(color, line_width);
        self.context.begin_path();
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.stroke();
    }

    fn polyline(&mut self, points: &[PixelPoint], color: &str, line_width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_stroke(color, line_width);
        self.context.begin_path();
        self.context.move_to(first.x, first.y);
        for p in rest {
            self.context.line_to(p.x, p.y);
        }
        self.context.stroke();
    }

    fn circle(&mut self, center: PixelPoint, radius: f64, color: &str) {
        self.set_fill(color);
        self.context.begin_path();
        if self
            .context
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.context.fill();
        }
    }

    fn text(&mut self, text: &str, at: PixelPoint, color: &str, align: TextAlign) {
        self.set_fill(color);
        self.context.set_text_align(align.as_canvas_str());
        self.context.set_text_baseline("middle");
        if let Err(e) = self.context.fill_text(text, at.x, at.y) {
            get_logger().warn(
                LogComponent::Infrastructure("CanvasBackend"),
                &format!("fill_text failed: {:?}", e),
            );
        }
    }

    fn end_frame(&mut self) -> ChartResult<()> {
        Ok(())
    }

    fn release(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
            get_logger().debug(LogComponent::Infrastructure("CanvasBackend"), "canvas removed");
        }
    }
}

impl Drop for CanvasBackend {
    fn drop(&mut self) {
        self.release();
    }
}
