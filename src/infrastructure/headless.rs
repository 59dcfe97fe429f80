//! In-memory host for native builds and tests.
//!
//! Records every draw call, keeps overlays as plain state and lets the caller
//! drive pointer, resize and frame events by hand.

use super::host::{HostContainer, ListenerHandle, OverlayElement, OverlayRole, OverlaySpec};
use super::rendering::{RenderBackend, TextAlign};
use crate::domain::chart::PixelPoint;
use crate::domain::errors::{ChartError, ChartResult};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame { background: String },
    Font(String),
    FillRect { x: f64, y: f64, width: f64, height: f64, color: String },
    StrokeRect { x: f64, y: f64, width: f64, height: f64, color: String, line_width: f64 },
    Line { from: PixelPoint, to: PixelPoint, color: String, line_width: f64 },
    Polyline { points: Vec<PixelPoint>, color: String, line_width: f64 },
    Circle { center: PixelPoint, radius: f64, color: String },
    Text { text: String, at: PixelPoint, color: String, align: TextAlign },
    EndFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerLeave,
    ViewportResize,
    NextFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySnapshot {
    pub role: OverlayRole,
    pub style: Vec<(&'static str, String)>,
    pub html: String,
    pub visible: bool,
    pub left: Option<f64>,
    pub top: Option<f64>,
}

impl OverlaySnapshot {
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style.iter().find(|(p, _)| *p == property).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct OverlayState {
    snapshot: OverlaySnapshot,
    removed: bool,
}

#[derive(Debug, Default)]
struct BackendState {
    width: f64,
    height: f64,
    frame_count: usize,
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    released: bool,
}

type Shared<T> = Rc<RefCell<T>>;

#[derive(Default)]
struct HostState {
    width: f64,
    next_id: u64,
    backends: Vec<Shared<BackendState>>,
    overlays: Vec<Shared<OverlayState>>,
    pointer_move: Vec<(u64, Shared<Box<dyn FnMut(PixelPoint)>>)>,
    pointer_leave: Vec<(u64, Shared<Box<dyn FnMut()>>)>,
    viewport_resize: Vec<(u64, Shared<Box<dyn FnMut()>>)>,
    next_frame: Vec<(u64, Box<dyn FnOnce()>)>,
}

impl HostState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_listener(&mut self, kind: ListenerKind, id: u64) {
        match kind {
            ListenerKind::PointerMove => self.pointer_move.retain(|(i, _)| *i != id),
            ListenerKind::PointerLeave => self.pointer_leave.retain(|(i, _)| *i != id),
            ListenerKind::ViewportResize => self.viewport_resize.retain(|(i, _)| *i != id),
            ListenerKind::NextFrame => self.next_frame.retain(|(i, _)| *i != id),
        }
    }

    fn is_registered(&self, kind: ListenerKind, id: u64) -> bool {
        match kind {
            ListenerKind::PointerMove => self.pointer_move.iter().any(|(i, _)| *i == id),
            ListenerKind::PointerLeave => self.pointer_leave.iter().any(|(i, _)| *i == id),
            ListenerKind::ViewportResize => self.viewport_resize.iter().any(|(i, _)| *i == id),
            ListenerKind::NextFrame => self.next_frame.iter().any(|(i, _)| *i == id),
        }
    }
}

/// Cloning shares the same host
#[derive(Clone, Default)]
pub struct HeadlessContainer {
    state: Shared<HostState>,
}

impl HeadlessContainer {
    pub fn new(width: f64) -> Self {
        let container = Self::default();
        container.set_width(width);
        container
    }

    /// Change the measured width without notifying anyone
    pub fn set_width(&self, width: f64) {
        self.state.borrow_mut().width = width;
    }

    pub fn pointer_move(&self, x: f64, y: f64) {
        let handlers: Vec<_> = self.state.borrow().pointer_move.iter().map(|(id, h)| (*id, h.clone())).collect();
        for (id, handler) in handlers {
            if self.state.borrow().is_registered(ListenerKind::PointerMove, id) {
                (*handler.borrow_mut())(PixelPoint::new(x, y));
            }
        }
    }

    pub fn pointer_leave(&self) {
        let handlers: Vec<_> = self.state.borrow().pointer_leave.iter().map(|(id, h)| (*id, h.clone())).collect();
        for (id, handler) in handlers {
            if self.state.borrow().is_registered(ListenerKind::PointerLeave, id) {
                (*handler.borrow_mut())();
            }
        }
    }

    /// Set the width and fire the viewport resize event
    pub fn resize_viewport(&self, width: f64) {
        self.set_width(width);
        let handlers: Vec<_> = self.state.borrow().viewport_resize.iter().map(|(id, h)| (*id, h.clone())).collect();
        for (id, handler) in handlers {
            if self.state.borrow().is_registered(ListenerKind::ViewportResize, id) {
                (*handler.borrow_mut())();
            }
        }
    }

    /// Run the callbacks queued for the next frame. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let pending = std::mem::take(&mut self.state.borrow_mut().next_frame);
        let count = pending.len();
        for (_, callback) in pending {
            callback();
        }
        count
    }

    /// Overlays currently attached to the container
    pub fn overlay_count(&self) -> usize {
        self.state.borrow().overlays.iter().filter(|o| !o.borrow().removed).count()
    }

    pub fn overlay_count_of(&self, role: OverlayRole) -> usize {
        self.state
            .borrow()
            .overlays
            .iter()
            .filter(|o| {
                let o = o.borrow();
                !o.removed && o.snapshot.role == role
            })
            .count()
    }

    pub fn overlay(&self, role: OverlayRole) -> Option<OverlaySnapshot> {
        self.state.borrow().overlays.iter().find_map(|o| {
            let o = o.borrow();
            (!o.removed && o.snapshot.role == role).then(|| o.snapshot.clone())
        })
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        let state = self.state.borrow();
        match kind {
            ListenerKind::PointerMove => state.pointer_move.len(),
            ListenerKind::PointerLeave => state.pointer_leave.len(),
            ListenerKind::ViewportResize => state.viewport_resize.len(),
            ListenerKind::NextFrame => state.next_frame.len(),
        }
    }

    pub fn total_listener_count(&self) -> usize {
        [
            ListenerKind::PointerMove,
            ListenerKind::PointerLeave,
            ListenerKind::ViewportResize,
            ListenerKind::NextFrame,
        ]
        .into_iter()
        .map(|kind| self.listener_count(kind))
        .sum()
    }

    /// Drawing surfaces created and not yet released
    pub fn live_backends(&self) -> usize {
        self.state.borrow().backends.iter().filter(|b| !b.borrow().released).count()
    }

    fn live_backend(&self) -> Option<Shared<BackendState>> {
        self.state.borrow().backends.iter().rev().find(|b| !b.borrow().released).cloned()
    }

    pub fn backend_size(&self) -> Option<(f64, f64)> {
        self.live_backend().map(|b| {
            let b = b.borrow();
            (b.width, b.height)
        })
    }

    /// Commands of the last completed frame of the live backend
    pub fn last_frame(&self) -> Vec<DrawCommand> {
        self.live_backend().map(|b| b.borrow().last_frame.clone()).unwrap_or_default()
    }

    pub fn frame_count(&self) -> usize {
        self.live_backend().map(|b| b.borrow().frame_count).unwrap_or(0)
    }

    fn register(&self, kind: ListenerKind, insert: impl FnOnce(&mut HostState, u64)) -> ListenerHandle {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id();
            insert(&mut *state, id);
            id
        };
        let host: Weak<RefCell<HostState>> = Rc::downgrade(&self.state);
        ListenerHandle::new(move || {
            if let Some(host) = host.upgrade() {
                host.borrow_mut().remove_listener(kind, id);
            }
        })
    }
}

impl HostContainer for HeadlessContainer {
    fn width(&self) -> f64 {
        self.state.borrow().width
    }

    fn create_backend(&self, width: f64, height: f64) -> ChartResult<Box<dyn RenderBackend>> {
        let backend = Rc::new(RefCell::new(BackendState { width, height, ..BackendState::default() }));
        self.state.borrow_mut().backends.push(backend.clone());
        Ok(Box::new(HeadlessBackend { state: backend }))
    }

    fn create_overlay(&self, spec: &OverlaySpec) -> ChartResult<Box<dyn OverlayElement>> {
        let overlay = Rc::new(RefCell::new(OverlayState {
            snapshot: OverlaySnapshot {
                role: spec.role,
                style: spec.style.clone(),
                html: spec.html.clone(),
                visible: spec.style.iter().all(|(p, v)| !(*p == "display" && v == "none")),
                left: None,
                top: None,
            },
            removed: false,
        }));
        self.state.borrow_mut().overlays.push(overlay.clone());
        Ok(Box::new(HeadlessOverlay { state: overlay }))
    }

    fn on_pointer_move(&self, handler: Box<dyn FnMut(PixelPoint)>) -> ChartResult<ListenerHandle> {
        let handler = Rc::new(RefCell::new(handler));
        Ok(self.register(ListenerKind::PointerMove, |s, id| s.pointer_move.push((id, handler))))
    }

    fn on_pointer_leave(&self, handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle> {
        let handler = Rc::new(RefCell::new(handler));
        Ok(self.register(ListenerKind::PointerLeave, |s, id| s.pointer_leave.push((id, handler))))
    }

    fn on_viewport_resize(&self, handler: Box<dyn FnMut()>) -> ChartResult<ListenerHandle> {
        let handler = Rc::new(RefCell::new(handler));
        Ok(self.register(ListenerKind::ViewportResize, |s, id| s.viewport_resize.push((id, handler))))
    }

    fn on_next_frame(&self, handler: Box<dyn FnOnce()>) -> ChartResult<ListenerHandle> {
        Ok(self.register(ListenerKind::NextFrame, |s, id| s.next_frame.push((id, handler))))
    }
}

pub struct HeadlessBackend {
    state: Shared<BackendState>,
}

impl HeadlessBackend {
    fn record(&self, command: DrawCommand) {
        let mut state = self.state.borrow_mut();
        if !state.released {
            state.current.push(command);
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let mut state = self.state.borrow_mut();
        if state.released {
            return Err(ChartError::SurfaceDestroyed);
        }
        state.width = width;
        state.height = height;
        Ok(())
    }

    fn begin_frame(&mut self, background: &str) -> ChartResult<()> {
        let mut state = self.state.borrow_mut();
        if state.released {
            return Err(ChartError::SurfaceDestroyed);
        }
        state.current.clear();
        state.current.push(DrawCommand::BeginFrame { background: background.to_string() });
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.record(DrawCommand::Font(font.to_string()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.record(DrawCommand::FillRect { x, y, width, height, color: color.to_string() });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64) {
        self.record(DrawCommand::StrokeRect { x, y, width, height, color: color.to_string(), line_width });
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: &str, line_width: f64) {
        self.record(DrawCommand::Line { from, to, color: color.to_string(), line_width });
    }

    fn polyline(&mut self, points: &[PixelPoint], color: &str, line_width: f64) {
        self.record(DrawCommand::Polyline { points: points.to_vec(), color: color.to_string(), line_width });
    }

    fn circle(&mut self, center: PixelPoint, radius: f64, color: &str) {
        self.record(DrawCommand::Circle { center, radius, color: color.to_string() });
    }

    fn text(&mut self, text: &str, at: PixelPoint, color: &str, align: TextAlign) {
        self.record(DrawCommand::Text { text: text.to_string(), at, color: color.to_string(), align });
    }

    fn end_frame(&mut self) -> ChartResult<()> {
        let mut state = self.state.borrow_mut();
        if state.released {
            return Err(ChartError::SurfaceDestroyed);
        }
        state.current.push(DrawCommand::EndFrame);
        state.last_frame = std::mem::take(&mut state.current);
        state.frame_count += 1;
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.state.borrow_mut();
        state.released = true;
        state.current.clear();
    }
}

struct HeadlessOverlay {
    state: Shared<OverlayState>,
}

impl OverlayElement for HeadlessOverlay {
    fn set_html(&self, html: &str) {
        let mut state = self.state.borrow_mut();
        if !state.removed {
            state.snapshot.html = html.to_string();
        }
    }

    fn set_position(&self, left: f64, top: f64) {
        let mut state = self.state.borrow_mut();
        if !state.removed {
            state.snapshot.left = Some(left);
            state.snapshot.top = Some(top);
        }
    }

    fn set_visible(&self, visible: bool) {
        let mut state = self.state.borrow_mut();
        if !state.removed {
            state.snapshot.visible = visible;
        }
    }

    fn is_visible(&self) -> bool {
        let state = self.state.borrow();
        !state.removed && state.snapshot.visible
    }

    fn remove(&self) {
        self.state.borrow_mut().removed = true;
    }
}
