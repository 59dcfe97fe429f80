use crate::config::TooltipStyle;
use crate::domain::chart::{PixelPoint, TooltipCommand, TooltipContent};
use crate::domain::errors::ChartResult;
use crate::infrastructure::host::{HostContainer, OverlayElement, OverlayRole, OverlaySpec};
use std::cell::RefCell;

/// Floating tooltip overlay driven by [`TooltipCommand`]s.
///
/// Once released, every call is a no-op.
pub struct TooltipPresenter {
    element: RefCell<Option<Box<dyn OverlayElement>>>,
    offset: PixelPoint,
}

impl TooltipPresenter {
    pub fn create(container: &dyn HostContainer, style: &TooltipStyle) -> ChartResult<Self> {
        let spec = OverlaySpec::new(OverlayRole::Tooltip)
            .style("position", "absolute")
            .style("display", "none")
            .style("pointer-events", "none")
            .style("background", style.background.clone())
            .style("color", style.text_color.clone())
            .style("padding", "8px")
            .style("border-radius", "4px")
            .style("font-size", "12px")
            .style("z-index", "1000");
        let element = container.create_overlay(&spec)?;
        Ok(Self {
            element: RefCell::new(Some(element)),
            offset: PixelPoint::new(style.offset_x, style.offset_y),
        })
    }

    pub fn apply(&self, command: TooltipCommand) {
        match command {
            TooltipCommand::Show { content, at } => self.show(&content, at),
            TooltipCommand::Hide => self.hide(),
        }
    }

    pub fn show(&self, content: &TooltipContent, at: PixelPoint) {
        if let Some(element) = self.element.borrow().as_ref() {
            let position = at.offset(self.offset.x, self.offset.y);
            element.set_html(&content.to_html());
            element.set_position(position.x, position.y);
            element.set_visible(true);
        }
    }

    pub fn hide(&self) {
        if let Some(element) = self.element.borrow().as_ref()
            && element.is_visible()
        {
            element.set_visible(false);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.element.borrow().as_ref().is_some_and(|e| e.is_visible())
    }

    pub fn is_released(&self) -> bool {
        self.element.borrow().is_none()
    }

    /// Remove the overlay from the container
    pub fn release(&self) {
        if let Some(element) = self.element.borrow_mut().take() {
            element.remove();
        }
    }
}

impl Drop for TooltipPresenter {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::{CandlePoint, SentimentPoint, Timestamp};
    use crate::infrastructure::HeadlessContainer;

    fn content() -> TooltipContent {
        let candle = CandlePoint { time: Timestamp::new(1_704_153_600), open: 1.0, high: 2.0, low: 0.5, close: 1.5 };
        TooltipContent::new(&candle, &SentimentPoint { time: candle.time, value: 0.3 }, 0.1)
    }

    #[test]
    fn show_offsets_from_pointer() {
        let host = HeadlessContainer::new(800.0);
        let tooltip = TooltipPresenter::create(&host, &TooltipStyle::default()).unwrap();
        assert!(!tooltip.is_visible());
        tooltip.show(&content(), PixelPoint::new(100.0, 40.0));
        let overlay = host.overlay(OverlayRole::Tooltip).unwrap();
        assert!(overlay.visible);
        assert_eq!((overlay.left, overlay.top), (Some(115.0), Some(55.0)));
        assert_eq!(overlay.style_value("pointer-events"), Some("none"));
        assert_eq!(overlay.style_value("z-index"), Some("1000"));
    }

    #[test]
    fn hide_after_release_is_noop() {
        let host = HeadlessContainer::new(800.0);
        let tooltip = TooltipPresenter::create(&host, &TooltipStyle::default()).unwrap();
        tooltip.hide();
        tooltip.release();
        tooltip.release();
        tooltip.hide();
        tooltip.show(&content(), PixelPoint::default());
        assert!(tooltip.is_released());
        assert_eq!(host.overlay_count(), 0);
    }
}
