use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("element '{0}' not found")]
    MissingElement(String),

    #[error("element has no '{0}' attribute")]
    MissingAttribute(&'static str),

    #[error("'{0}' is not a recognised ISO-8601 timestamp")]
    InvalidTimestamp(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("'{0}' is not a usable class name")]
    InvalidClassName(String),

    #[error("invalid annotator config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for AnnotateError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        AnnotateError::Dom(message)
    }
}

pub type Result<T, E = AnnotateError> = std::result::Result<T, E>;
