use once_cell::sync::OnceCell;
use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;

pub mod application;
pub mod config;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

pub use application::SentimentChart;
pub use config::ChartConfig;
pub use domain::errors::{ChartError, ChartResult};
pub use domain::sentiment::RawDataset;
pub use presentation::{SentimentChartApi, SentimentChartTile};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the panic hook, console logger and browser clock. Runs once;
/// later calls do nothing.
#[wasm_bindgen(start)]
pub fn initialize() {
    INITIALIZED.get_or_init(|| {
        console_error_panic_hook::set_once();

        let console_logger = Box::new(infrastructure::services::ConsoleLogger::new_development());
        domain::logging::init_logger(console_logger);

        let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider);
        domain::logging::init_time_provider(browser_time_provider);

        log_info!(LogComponent::Presentation("Initialize"), "sentiment chart ready");
    });
}
