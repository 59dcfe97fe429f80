use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::infrastructure::host::{HostContainer, ListenerHandle};
use crate::infrastructure::rendering::ChartSurface;
use crate::log_debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Keeps the surface width in step with its container.
///
/// Holds weak references only: once the surface or the container is gone
/// every event is ignored.
pub struct ResizeAdapter {
    surface: Weak<RefCell<ChartSurface>>,
    container: Weak<dyn HostContainer>,
    resize_listener: Option<ListenerHandle>,
    retry: Option<ListenerHandle>,
}

impl ResizeAdapter {
    /// Fit once now, retry on the next frame if the container has no width
    /// yet, then follow viewport resizes.
    pub fn attach(surface: &Rc<RefCell<ChartSurface>>, container: &Rc<dyn HostContainer>) -> ChartResult<Self> {
        let weak_surface = Rc::downgrade(surface);
        let weak_container = Rc::downgrade(container);

        Self::apply_with(&weak_surface, &weak_container);

        let retry = if container.width() <= 0.0 {
            let (s, c) = (weak_surface.clone(), weak_container.clone());
            Some(container.on_next_frame(Box::new(move || Self::apply_with(&s, &c)))?)
        } else {
            None
        };

        let (s, c) = (weak_surface.clone(), weak_container.clone());
        let resize_listener = container.on_viewport_resize(Box::new(move || Self::apply_with(&s, &c)))?;

        Ok(Self {
            surface: weak_surface,
            container: weak_container,
            resize_listener: Some(resize_listener),
            retry,
        })
    }

    /// Re-read the container width and resize the surface
    pub fn apply(&self) {
        Self::apply_with(&self.surface, &self.container);
    }

    fn apply_with(surface: &Weak<RefCell<ChartSurface>>, container: &Weak<dyn HostContainer>) {
        let (Some(surface), Some(container)) = (surface.upgrade(), container.upgrade()) else {
            return;
        };
        let Ok(mut surface) = surface.try_borrow_mut() else {
            log_debug!(LogComponent::Application("ResizeAdapter"), "surface busy, skipping resize");
            return;
        };
        if surface.is_destroyed() {
            return;
        }
        surface.resize(container.width());
    }

    /// Stop listening. Safe to call more than once.
    pub fn detach(&mut self) {
        self.resize_listener.take();
        self.retry.take();
    }
}

impl Drop for ResizeAdapter {
    fn drop(&mut self) {
        self.detach();
    }
}
