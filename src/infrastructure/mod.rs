pub mod dom;
pub mod headless;
pub mod host;
pub mod rendering;
pub mod services;

pub use dom::DomContainer;
pub use headless::{DrawCommand, HeadlessContainer, ListenerKind};
pub use host::{HostContainer, ListenerHandle, OverlayElement, OverlayRole, OverlaySpec};
pub use services::{BrowserTimeProvider, ConsoleLogger};
