//! Error types for decoding rich text.

use thiserror::Error;

/// Errors raised while decoding component JSON.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input was not valid JSON.
    #[error("invalid component json: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that does not describe a text component.
    #[error("unsupported component: {0}")]
    Component(String),

    /// A translatable component, which has no literal text to rewrite.
    #[error("translatable component: {0}")]
    Translatable(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::Component("null".to_string());
        assert_eq!(err.to_string(), "unsupported component: null");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RenderError = json_err.into();
        assert!(matches!(err, RenderError::Json(_)));
        assert!(err.to_string().starts_with("invalid component json"));
    }
}
