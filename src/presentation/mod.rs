pub mod component;
pub mod wasm_api;

pub use component::SentimentChartTile;
pub use wasm_api::SentimentChartApi;
