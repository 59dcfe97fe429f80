use super::entities::SeriesView;
use super::tooltip::TooltipContent;
use super::value_objects::PixelPoint;
use crate::domain::sentiment::Timestamp;

/// Crosshair movement as reported by the chart surface. Both fields are
/// `None` when the pointer is outside the plot area.
#[derive(Debug, Clone, Copy)]
pub struct CrosshairMove<'a> {
    pub time: Option<Timestamp>,
    pub point: Option<PixelPoint>,
    pub series: SeriesView<'a>,
}

impl<'a> CrosshairMove<'a> {
    pub fn hidden(series: SeriesView<'a>) -> Self {
        Self { time: None, point: None, series }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorState {
    Idle,
    Hovering(Timestamp),
}

/// What the tooltip should do after a cursor transition
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipCommand {
    Show { content: TooltipContent, at: PixelPoint },
    Hide,
}

/// Idle / Hovering state machine behind the tooltip
#[derive(Debug, Clone)]
pub struct CursorTracker {
    state: CursorState,
    signal_threshold: f64,
}

impl CursorTracker {
    pub fn new(signal_threshold: f64) -> Self {
        Self { state: CursorState::Idle, signal_threshold }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Hovering requires a time, a point and a match in both series.
    /// Anything less is Idle; partial data is never shown.
    pub fn on_crosshair_move(&mut self, event: &CrosshairMove<'_>) -> TooltipCommand {
        let (Some(time), Some(point)) = (event.time, event.point) else {
            return self.go_idle();
        };
        let (Some(candle), Some(sentiment)) = (event.series.candle_at(time), event.series.sentiment_at(time)) else {
            return self.go_idle();
        };
        self.state = CursorState::Hovering(time);
        TooltipCommand::Show {
            content: TooltipContent::new(candle, sentiment, self.signal_threshold),
            at: point,
        }
    }

    /// Pointer left the container; the move stream may never report it
    pub fn on_pointer_leave(&mut self) -> TooltipCommand {
        self.go_idle()
    }

    fn go_idle(&mut self) -> TooltipCommand {
        self.state = CursorState::Idle;
        TooltipCommand::Hide
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{CandleSeries, LineSeries};
    use crate::domain::sentiment::{CandlePoint, SentimentPoint};

    fn series() -> (CandleSeries, LineSeries) {
        let mut candles = CandleSeries::default();
        candles.set_data(vec![
            CandlePoint { time: Timestamp::new(100), open: 10.0, high: 13.0, low: 9.0, close: 12.0 },
            CandlePoint { time: Timestamp::new(200), open: 12.0, high: 12.5, low: 11.0, close: 11.5 },
        ]);
        let mut line = LineSeries::default();
        line.set_data(vec![SentimentPoint { time: Timestamp::new(100), value: 0.5 }]);
        (candles, line)
    }

    #[test]
    fn hover_on_matched_time_shows_tooltip() {
        let (candles, line) = series();
        let view = SeriesView { candles: Some(&candles), sentiment: Some(&line) };
        let mut tracker = CursorTracker::new(0.1);
        let event = CrosshairMove { time: Some(Timestamp::new(100)), point: Some(PixelPoint::new(5.0, 6.0)), series: view };
        match tracker.on_crosshair_move(&event) {
            TooltipCommand::Show { content, at } => {
                assert_eq!(content.close, 12.0);
                assert_eq!(content.sentiment, 0.5);
                assert_eq!(at, PixelPoint::new(5.0, 6.0));
            }
            TooltipCommand::Hide => panic!("expected tooltip"),
        }
        assert_eq!(tracker.state(), CursorState::Hovering(Timestamp::new(100)));
    }

    #[test]
    fn partial_match_hides() {
        let (candles, line) = series();
        let view = SeriesView { candles: Some(&candles), sentiment: Some(&line) };
        let mut tracker = CursorTracker::new(0.1);
        let event = CrosshairMove { time: Some(Timestamp::new(200)), point: Some(PixelPoint::default()), series: view };
        assert_eq!(tracker.on_crosshair_move(&event), TooltipCommand::Hide);
        assert_eq!(tracker.state(), CursorState::Idle);
    }

    #[test]
    fn null_point_or_leave_returns_to_idle() {
        let (candles, line) = series();
        let view = SeriesView { candles: Some(&candles), sentiment: Some(&line) };
        let mut tracker = CursorTracker::new(0.1);
        let hover = CrosshairMove { time: Some(Timestamp::new(100)), point: Some(PixelPoint::default()), series: view };
        tracker.on_crosshair_move(&hover);
        let no_point = CrosshairMove { time: Some(Timestamp::new(100)), point: None, series: view };
        assert_eq!(tracker.on_crosshair_move(&no_point), TooltipCommand::Hide);

        tracker.on_crosshair_move(&hover);
        assert_eq!(tracker.on_pointer_leave(), TooltipCommand::Hide);
        assert_eq!(tracker.state(), CursorState::Idle);
    }

    #[test]
    fn missing_series_never_matches() {
        let mut tracker = CursorTracker::new(0.1);
        let event = CrosshairMove {
            time: Some(Timestamp::new(100)),
            point: Some(PixelPoint::default()),
            series: SeriesView::default(),
        };
        assert_eq!(tracker.on_crosshair_move(&event), TooltipCommand::Hide);
    }
}
