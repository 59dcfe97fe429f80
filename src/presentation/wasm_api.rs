use wasm_bindgen::prelude::*;

use crate::application::SentimentChart;
use crate::config::ChartConfig;
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::DomContainer;
use std::rc::Rc;

/// JS facade over [`SentimentChart`] for hosts without Leptos
#[wasm_bindgen]
pub struct SentimentChartApi {
    chart: SentimentChart,
}

#[wasm_bindgen]
impl SentimentChartApi {
    /// Bind to the element with `container_id`. `config_json` overrides the
    /// default look.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: Option<String>) -> Result<SentimentChartApi, JsValue> {
        let config = match config_json {
            Some(json) => ChartConfig::from_json(&json)?,
            None => ChartConfig::default(),
        };
        let container = DomContainer::from_id(container_id)?;
        let chart = SentimentChart::new(Rc::new(container), config)?;
        get_logger().info(
            LogComponent::Presentation("SentimentChartApi"),
            &format!("bound to #{}", container_id),
        );
        Ok(Self { chart })
    }

    /// Rebuild the chart from a backend JSON payload. Returns the number of
    /// points drawn.
    pub fn render(&mut self, json: &str) -> Result<usize, JsValue> {
        let report = self.chart.render_json(json)?;
        Ok(report.kept)
    }

    pub fn resize(&self) {
        self.chart.resize();
    }

    pub fn destroy(&mut self) {
        self.chart.unmount();
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.chart.is_mounted()
    }
}
