use super::host::{HostContainer, ListenerHandle, OverlayElement, OverlaySpec};
use super::rendering::{CanvasBackend, RenderBackend};
use crate::domain::chart::PixelPoint;
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::event_utils::{EventOptions, window_event_listener_with_options};
use gloo::events::EventListener;
use gloo::render::request_animation_frame;
use std::cell::Cell;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

/// A DOM element hosting one chart
#[derive(Clone)]
pub struct DomContainer {
    element: HtmlElement,
    document: Document,
}

impl DomContainer {
    pub fn new(element: HtmlElement) -> ChartResult<Self> {
        let document = element
            .owner_document()
            .ok_or_else(|| ChartError::Dom("container is not attached to a document".into()))?;
        let style = element.style();
        // Overlays are absolutely positioned against the container
        if style.get_property_value("position").unwrap_or_default().is_empty() {
            style
                .set_property("position", "relative")
                .map_err(|e| ChartError::dom("style container", e))?;
        }
        Ok(Self { element, document })
    }

    pub fn from_id(id: &str) -> ChartResult<Self> {
        let element = gloo::utils::document()
            .get_element_by_id(id)
            .ok_or_else(|| ChartError::Dom(format!("element #{} not found", id)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ChartError::Dom(format!("element #{} is not an HtmlElement", id)))?;
        Self::new(element)
    }
}

impl HostContainer for DomContainer {
    fn width(&self) -> f64 {
        self.element.offset_width().max(0) as f64
    }

    fn create_backend(&self, width: f64, height: f64) -> ChartResult<Box<dyn RenderBackend>> {
        Ok(Box::new(CanvasBackend::create(&self.document, &self.element, width, height)?))
    }

    fn create_overlay(&self, spec: &OverlaySpec) -> ChartResult<Box<dyn OverlayElement>> {
        let element = self
            .document
            .create_element("div")
            .map_err(|e| ChartError::dom("create overlay", e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ChartError::Dom("overlay is not an HtmlElement".into()))?;
        element
            .set_attribute("data-role", spec.role.as_ref())
            .map_err(|e| ChartError::dom("tag overlay", e))?;
        let style = element.style();
        for (property, value) in &spec.style {
            style
                .set_property(property, value)
                .map_err(|e| ChartError::dom("style overlay", e))?;
        }
        element.set_inner_html(&spec.html);
        self.element
            .append_child(&element)
            .map_err(|e| ChartError::dom("append overlay", e))?;
        Ok(Box::new(DomOverlay { element, removed: Cell::new(false) }))
    }

    fn on_pointer_move(&self, mut handler: Box<dyn FnMut(PixelPoint)>) -> ChartResult<ListenerHandle> {
        let target = self.element.clone();
        let listener = EventListener::new(&self.element, "mousemove", move |event: &Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = target.get_bounding_client_rect();
            handler(PixelPoint::new(
                mouse.client_x() as f64 - rect.left(),
                mouse.client_y() as f64 - rect.top(),
            ));
        });
        Ok(ListenerHandle::new(move || drop(listener)))
    }

    fn on_pointer_leave(&self, mut handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle> {
        let listener = EventListener::new(&self.element, "mouseleave", move |_| handler());
        Ok(ListenerHandle::new(move || drop(listener)))
    }

    fn on_viewport_resize(&self, mut handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle> {
        let handle = window_event_listener_with_options("resize", &EventOptions::default(), move |_| handler())
            .map_err(|e| ChartError::dom("listen to window resize", e))?;
        Ok(ListenerHandle::new(move || handle.remove()))
    }

    fn on_next_frame(&self, handler: Box<dyn FnOnce()>) -> ChartResult<ListenerHandle> {
        let frame = request_animation_frame(move |_| handler());
        Ok(ListenerHandle::new(move || drop(frame)))
    }
}

struct DomOverlay {
    element: HtmlElement,
    removed: Cell<bool>,
}

impl DomOverlay {
    fn set_style(&self, property: &str, value: &str) {
        if self.removed.get() {
            return;
        }
        if let Err(e) = self.element.style().set_property(property, value) {
            get_logger().warn(
                LogComponent::Infrastructure("DomOverlay"),
                &format!("failed to set {}: {:?}", property, e),
            );
        }
    }
}

impl OverlayElement for DomOverlay {
    fn set_html(&self, html: &str) {
        if !self.removed.get() {
            self.element.set_inner_html(html);
        }
    }

    fn set_position(&self, left: f64, top: f64) {
        self.set_style("left", &format!("{}px", left));
        self.set_style("top", &format!("{}px", top));
    }

    fn set_visible(&self, visible: bool) {
        self.set_style("display", if visible { "block" } else { "none" });
    }

    fn is_visible(&self) -> bool {
        !self.removed.get() && self.element.style().get_property_value("display").unwrap_or_default() != "none"
    }

    fn remove(&self) {
        if !self.removed.replace(true) {
            self.element.remove();
        }
    }
}
