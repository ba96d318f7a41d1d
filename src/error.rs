//! Structured error types for gridview.
//!
//! The layout and update passes never fail; these errors only come from
//! the edges of the crate (configuration decoding, CLI input).

/// All errors that can occur at gridview's fallible edges.
#[derive(Debug, thiserror::Error)]
pub enum GridviewError {
    /// JSON encoding or decoding error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid grid description or configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridviewError>;

impl From<String> for GridviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridviewError> for wasm_bindgen::JsValue {
    fn from(e: GridviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
