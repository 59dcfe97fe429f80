use derive_more::Display;
use wasm_bindgen::JsValue;

/// Errors surfaced by the chart. Data-quality problems are not errors:
/// incomplete records are filtered, missing sentiment is defaulted.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ChartError {
    #[display(fmt = "DOM error: {}", _0)]
    Dom(String),
    #[display(fmt = "Rendering error: {}", _0)]
    Rendering(String),
    #[display(fmt = "Invalid data: {}", _0)]
    InvalidData(String),
    #[display(fmt = "Config error: {}", _0)]
    Config(String),
    #[display(fmt = "Chart surface already destroyed")]
    SurfaceDestroyed,
}

impl std::error::Error for ChartError {}

impl ChartError {
    /// Wrap a JS exception thrown by a browser API
    pub fn dom(context: &str, err: JsValue) -> Self {
        ChartError::Dom(format!("{}: {:?}", context, err))
    }
}

impl From<ChartError> for JsValue {
    fn from(err: ChartError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::InvalidData(err.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(ChartError::Dom("no window".into()).to_string(), "DOM error: no window");
        assert_eq!(ChartError::SurfaceDestroyed.to_string(), "Chart surface already destroyed");
    }

    #[test]
    fn json_errors_become_invalid_data() {
        let err: ChartError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, ChartError::InvalidData(_)));
    }
}
