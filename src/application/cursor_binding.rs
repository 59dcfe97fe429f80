use super::tooltip_presenter::TooltipPresenter;
use crate::domain::chart::CursorTracker;
use crate::domain::errors::{ChartError, ChartResult};
use crate::infrastructure::host::{HostContainer, ListenerHandle};
use crate::infrastructure::rendering::{ChartSurface, SubscriptionId};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Wires the surface's crosshair stream and the container's pointer-leave
/// event into one [`CursorTracker`] and its tooltip.
pub struct CursorBinding {
    tooltip: Rc<TooltipPresenter>,
    surface: Weak<RefCell<ChartSurface>>,
    subscription: Option<SubscriptionId>,
    leave_listener: Option<ListenerHandle>,
}

impl CursorBinding {
    pub fn attach(
        surface: &Rc<RefCell<ChartSurface>>,
        container: &dyn HostContainer,
        tooltip: TooltipPresenter,
        signal_threshold: f64,
    ) -> ChartResult<Self> {
        let tracker = Rc::new(RefCell::new(CursorTracker::new(signal_threshold)));
        let tooltip = Rc::new(tooltip);

        let (t, p) = (tracker.clone(), Rc::downgrade(&tooltip));
        let subscription = surface
            .borrow_mut()
            .subscribe_crosshair_move(move |event| {
                let command = t.borrow_mut().on_crosshair_move(event);
                if let Some(tooltip) = p.upgrade() {
                    tooltip.apply(command);
                }
            })
            .ok_or(ChartError::SurfaceDestroyed)?;

        let (t, p) = (tracker, Rc::downgrade(&tooltip));
        let leave = container.on_pointer_leave(Box::new(move || {
            let command = t.borrow_mut().on_pointer_leave();
            if let Some(tooltip) = p.upgrade() {
                tooltip.apply(command);
            }
        }));
        let leave_listener = match leave {
            Ok(handle) => handle,
            Err(e) => {
                surface.borrow_mut().unsubscribe_crosshair_move(subscription);
                return Err(e);
            }
        };

        Ok(Self {
            tooltip,
            surface: Rc::downgrade(surface),
            subscription: Some(subscription),
            leave_listener: Some(leave_listener),
        })
    }

    pub fn tooltip(&self) -> &TooltipPresenter {
        &self.tooltip
    }

    /// Unsubscribe from the surface and the container, then remove the
    /// tooltip. Safe to call more than once.
    pub fn release(&mut self) {
        self.leave_listener.take();
        if let Some(id) = self.subscription.take()
            && let Some(surface) = self.surface.upgrade()
            && let Ok(mut surface) = surface.try_borrow_mut()
        {
            surface.unsubscribe_crosshair_move(id);
        }
        self.tooltip.hide();
        self.tooltip.release();
    }
}

impl Drop for CursorBinding {
    fn drop(&mut self) {
        self.release();
    }
}
