//! Boundary between the chart and the element hosting it.
//!
//! A host measures the container, creates the native drawing surface and the
//! two auxiliary overlays (legend, tooltip), and delivers pointer and
//! viewport events. Every subscription comes back as a [`ListenerHandle`]
//! that unsubscribes when removed or dropped.

use crate::domain::chart::PixelPoint;
use crate::domain::errors::ChartResult;
use crate::infrastructure::rendering::RenderBackend;
use strum::{AsRefStr, Display};

/// Releases one subscription exactly once, on `remove` or drop
#[must_use = "dropping a ListenerHandle unsubscribes immediately"]
pub struct ListenerHandle {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A handle with nothing to release
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn remove(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle").field("live", &self.release.is_some()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum OverlayRole {
    Legend,
    Tooltip,
}

/// Element to append to the container, outside the surface's own tree
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub role: OverlayRole,
    pub style: Vec<(&'static str, String)>,
    pub html: String,
}

impl OverlaySpec {
    pub fn new(role: OverlayRole) -> Self {
        Self { role, style: Vec::new(), html: String::new() }
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push((property, value.into()));
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }
}

/// An overlay owned by the chart. `remove` detaches it for good; every
/// later call is a no-op.
pub trait OverlayElement {
    fn set_html(&self, html: &str);
    fn set_position(&self, left: f64, top: f64);
    fn set_visible(&self, visible: bool);
    fn is_visible(&self) -> bool;
    fn remove(&self);
}

pub trait HostContainer {
    /// Current measured width in CSS pixels; 0 before layout
    fn width(&self) -> f64;

    /// Create the native drawing surface inside the container
    fn create_backend(&self, width: f64, height: f64) -> ChartResult<Box<dyn RenderBackend>>;

    fn create_overlay(&self, spec: &OverlaySpec) -> ChartResult<Box<dyn OverlayElement>>;

    /// Pointer position relative to the container's top-left corner
    fn on_pointer_move(&self, handler: Box<dyn FnMut(PixelPoint)>) -> ChartResult<ListenerHandle>;

    fn on_pointer_leave(&self, handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle>;

    /// Viewport (not only container) size changes
    fn on_viewport_resize(&self, handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle>;

    /// Run once after the next layout pass
    fn on_next_frame(&self, handler: Box<dyn FnOnce()>) -> ChartResult<ListenerHandle>;
}
