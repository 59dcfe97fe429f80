pub mod backend;
pub mod canvas_renderer;
pub mod chart_surface;

pub use backend::{RenderBackend, TextAlign};
pub use canvas_renderer::CanvasBackend;
pub use chart_surface::{ChartSurface, SharedSurface, SubscriptionId, SurfaceState};
