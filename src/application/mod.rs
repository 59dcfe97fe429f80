pub mod chart_service;
pub mod cursor_binding;
pub mod resize_adapter;
pub mod tooltip_presenter;

pub use chart_service::*;
pub use cursor_binding::*;
pub use resize_adapter::*;
pub use tooltip_presenter::*;
