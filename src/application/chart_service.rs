use super::cursor_binding::CursorBinding;
use super::resize_adapter::ResizeAdapter;
use super::tooltip_presenter::TooltipPresenter;
use crate::config::ChartConfig;
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::sentiment::{NormalizationReport, ProjectedSeries, RawDataset, RecordNormalizer, SeriesProjector};
use crate::infrastructure::host::HostContainer;
use crate::infrastructure::rendering::{ChartSurface, SharedSurface};
use crate::{log_debug, log_error, log_warn};
use std::rc::Rc;

/// Everything one render builds. Dropped as a unit.
struct ChartState {
    surface: SharedSurface,
    cursor: Option<CursorBinding>,
    resize: Option<ResizeAdapter>,
}

impl ChartState {
    fn build(container: &Rc<dyn HostContainer>, config: &ChartConfig, series: ProjectedSeries) -> ChartResult<Self> {
        let surface = ChartSurface::initialize(container.clone(), container.width(), config.height, config.clone())?;
        let mut state = ChartState { surface, cursor: None, resize: None };
        match state.wire(container, config, series) {
            Ok(()) => Ok(state),
            Err(e) => {
                log_error!(LogComponent::Application("SentimentChart"), "wiring failed, tearing down: {}", e);
                state.teardown();
                Err(e)
            }
        }
    }

    fn wire(&mut self, container: &Rc<dyn HostContainer>, config: &ChartConfig, series: ProjectedSeries) -> ChartResult<()> {
        {
            let mut surface = self.surface.borrow_mut();
            surface.install_candle_series(series.candles);
            surface.install_sentiment_series(series.sentiment);
            surface.attach_legend()?;
        }
        let tooltip = TooltipPresenter::create(container.as_ref(), &config.tooltip)?;
        self.cursor = Some(CursorBinding::attach(&self.surface, container.as_ref(), tooltip, config.signal_threshold)?);
        self.resize = Some(ResizeAdapter::attach(&self.surface, container)?);
        Ok(())
    }

    /// Listeners first, then the tooltip, then the surface itself
    fn teardown(&mut self) {
        if let Some(mut resize) = self.resize.take() {
            resize.detach();
        }
        if let Some(mut cursor) = self.cursor.take() {
            cursor.release();
        }
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => surface.destroy(),
            Err(_) => {
                log_warn!(
                    LogComponent::Application("SentimentChart"),
                    "surface borrowed during teardown; it is destroyed when released"
                );
            }
        }
    }
}

impl Drop for ChartState {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Owns at most one live chart inside a container.
///
/// `render` always tears the previous chart down before building the next,
/// so repeated renders never stack surfaces, overlays or listeners.
pub struct SentimentChart {
    container: Rc<dyn HostContainer>,
    config: ChartConfig,
    normalizer: RecordNormalizer,
    state: Option<ChartState>,
}

impl SentimentChart {
    pub fn new(container: Rc<dyn HostContainer>, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            container,
            normalizer: RecordNormalizer::new(config.neutral_sentiment),
            config,
            state: None,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn render(&mut self, dataset: &RawDataset) -> ChartResult<NormalizationReport> {
        self.unmount();

        let (points, report) = self.normalizer.normalize_with_report(dataset);
        let series = SeriesProjector::project(&points);
        self.state = Some(ChartState::build(&self.container, &self.config, series)?);

        log_debug!(
            LogComponent::Application("SentimentChart"),
            "rendered {} points ({} records in)",
            report.kept,
            dataset.len()
        );
        Ok(report)
    }

    /// Parse a backend JSON payload and render it
    pub fn render_json(&mut self, json: &str) -> ChartResult<NormalizationReport> {
        let dataset = RawDataset::from_json(json).map_err(|e| ChartError::InvalidData(e.to_string()))?;
        self.render(&dataset)
    }

    /// Re-read the container width. No-op without a live chart.
    pub fn resize(&self) {
        if let Some(resize) = self.state.as_ref().and_then(|s| s.resize.as_ref()) {
            resize.apply();
        }
    }

    /// Tear down the live chart, if any
    pub fn unmount(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.teardown();
            log_debug!(LogComponent::Application("SentimentChart"), "unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    /// Read access to the live surface
    pub fn with_surface<R>(&self, f: impl FnOnce(&ChartSurface) -> R) -> Option<R> {
        let state = self.state.as_ref()?;
        let surface = state.surface.try_borrow().ok()?;
        Some(f(&surface))
    }

    /// Whether the tooltip is currently shown
    pub fn tooltip_visible(&self) -> bool {
        self.state
            .as_ref()
            .and_then(|s| s.cursor.as_ref())
            .is_some_and(|c| c.tooltip().is_visible())
    }
}

impl Drop for SentimentChart {
    fn drop(&mut self) {
        self.unmount();
    }
}
