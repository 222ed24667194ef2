use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundError {
    /// No element with this id, or it is not a canvas.
    SurfaceMissing(String),
    /// The canvas refused to hand out a 2D context.
    ContextUnavailable,
    NoWindow,
    Js(String),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::SurfaceMissing(id) => write!(f, "canvas #{} not found", id),
            BackgroundError::ContextUnavailable => write!(f, "2d context unavailable"),
            BackgroundError::NoWindow => write!(f, "no browser window"),
            BackgroundError::Js(msg) => write!(f, "javascript error: {}", msg),
        }
    }
}

impl std::error::Error for BackgroundError {}

impl From<JsValue> for BackgroundError {
    fn from(value: JsValue) -> Self {
        BackgroundError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<BackgroundError> for JsValue {
    fn from(err: BackgroundError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
