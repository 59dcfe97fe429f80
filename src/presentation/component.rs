use crate::application::SentimentChart;
use crate::config::ChartConfig;
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::sentiment::RawDataset;
use crate::infrastructure::DomContainer;
use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

const DEFAULT_TITLE: &str = "Stock Prices & Sentiment";

/// Candlestick + sentiment tile.
///
/// Every change of `chart_data` rebuilds the chart from scratch; `None`
/// removes it. The chart is torn down when the component is cleaned up.
#[component]
pub fn SentimentChartTile(
    #[prop(into)] chart_data: Signal<Option<RawDataset>>,
    #[prop(optional)] config: Option<ChartConfig>,
    #[prop(optional, into)] title: Option<String>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let height = config.height;
    let container_ref = create_node_ref::<Div>();
    let chart: Rc<RefCell<Option<SentimentChart>>> = Rc::new(RefCell::new(None));

    let effect_chart = chart.clone();
    create_effect(move |_| {
        let Some(div) = container_ref.get() else {
            return;
        };
        let mut slot = effect_chart.borrow_mut();

        chart_data.with(|data| {
            let Some(dataset) = data else {
                if let Some(chart) = slot.as_mut() {
                    chart.unmount();
                }
                return;
            };

            if slot.is_none() {
                let element = (*div).clone().unchecked_into::<web_sys::HtmlElement>();
                match DomContainer::new(element).and_then(|c| SentimentChart::new(Rc::new(c), config.clone())) {
                    Ok(chart) => *slot = Some(chart),
                    Err(e) => {
                        get_logger().error(LogComponent::Presentation("SentimentChartTile"), &e.to_string());
                        return;
                    }
                }
            }

            if let Some(chart) = slot.as_mut()
                && let Err(e) = chart.render(dataset)
            {
                get_logger().error(
                    LogComponent::Presentation("SentimentChartTile"),
                    &format!("render failed: {}", e),
                );
            }
        });
    });

    on_cleanup(move || {
        if let Ok(mut slot) = chart.try_borrow_mut()
            && let Some(mut chart) = slot.take()
        {
            chart.unmount();
        }
    });

    view! {
        <div class="p-4 bg-gray-800 rounded-lg shadow-lg relative">
            <h2 class="text-lg font-semibold mb-4 text-gray-200">
                {title.unwrap_or_else(|| DEFAULT_TITLE.to_string())}
            </h2>
            <div
                node_ref=container_ref
                style=format!("height: {}px; width: 100%; position: relative;", height)
            />
        </div>
    }
}
