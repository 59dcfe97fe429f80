#![cfg(target_arch = "wasm32")]
use sentiment_chart_wasm::application::SentimentChart;
use sentiment_chart_wasm::infrastructure::DomContainer;
use sentiment_chart_wasm::{ChartConfig, SentimentChartApi};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PAYLOAD: &str = r#"{
    "2024-01-02": { "stock_data": { "Open": 10, "Close": 11, "maxDay": 12, "minDay": 9 }, "sentiment_score": 0.2 },
    "2024-01-03": { "stock_data": { "Open": 11, "Close": 10, "maxDay": 11.5, "minDay": 9.5 }, "sentiment_score": -0.2 }
}"#;

fn container(id: &str, width: &str) -> web_sys::HtmlElement {
    let document = gloo::utils::document();
    let div = document.create_element("div").unwrap().dyn_into::<web_sys::HtmlElement>().unwrap();
    div.set_id(id);
    div.style().set_property("width", width).unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn render_appends_canvas_and_overlays_once() {
    let element = container("chart-render", "640px");
    let host = DomContainer::new(element.clone()).unwrap();
    let mut chart = SentimentChart::new(Rc::new(host), ChartConfig::default()).unwrap();

    chart.render_json(PAYLOAD).unwrap();
    chart.render_json(PAYLOAD).unwrap();
    assert_eq!(element.query_selector_all("canvas").unwrap().length(), 1);
    assert_eq!(element.query_selector_all("[data-role=legend]").unwrap().length(), 1);
    assert_eq!(element.query_selector_all("[data-role=tooltip]").unwrap().length(), 1);

    let canvas = element.query_selector("canvas").unwrap().unwrap().dyn_into::<web_sys::HtmlCanvasElement>().unwrap();
    assert_eq!(canvas.width(), 640);
    assert_eq!(canvas.height(), 400);

    chart.unmount();
    assert_eq!(element.child_element_count(), 0);
    element.remove();
}

#[wasm_bindgen_test]
fn tooltip_ignores_pointer_and_stays_on_top() {
    let element = container("chart-tooltip", "500px");
    let mut chart = SentimentChart::new(Rc::new(DomContainer::new(element.clone()).unwrap()), ChartConfig::default()).unwrap();
    chart.render_json(PAYLOAD).unwrap();

    let tooltip = element
        .query_selector("[data-role=tooltip]")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    let style = tooltip.style();
    assert_eq!(style.get_property_value("pointer-events").unwrap(), "none");
    assert_eq!(style.get_property_value("z-index").unwrap(), "1000");
    assert_eq!(style.get_property_value("display").unwrap(), "none");

    drop(chart);
    assert!(element.query_selector("[data-role=tooltip]").unwrap().is_none());
    element.remove();
}

#[wasm_bindgen_test]
fn js_facade_round_trip() {
    let element = container("chart-api", "480px");
    let mut api = SentimentChartApi::new("chart-api", Some(r#"{"height": 300}"#.to_string())).unwrap();
    assert_eq!(api.render(PAYLOAD).unwrap(), 2);
    assert!(api.is_mounted());
    assert!(api.render("not json").is_err());
    api.destroy();
    assert!(!api.is_mounted());
    assert!(SentimentChartApi::new("missing-element", None).is_err());
    element.remove();
}
