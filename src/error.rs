use serde_json::Value;
use thiserror::Error;

use crate::engine::EngineError;
use crate::protocol::{ErrorCode, WireError};

/// Characters of user text kept when it appears in diagnostics.
pub const ELIDED_TEXT_CHARS: usize = 50;

/// Upper bound for the `details` field of an internal error.
pub const MAX_DETAIL_CHARS: usize = 200;

/// Every failure the service can report to a caller.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("`{field}` is {actual} characters long, limit is {max}")]
    TextTooLong {
        field: String,
        actual: usize,
        max: usize,
    },

    #[error("Invalid language code {0:?}: expected exactly three lowercase letters")]
    InvalidLanguageCode(String),

    #[error("Unsupported script: {0}")]
    UnsupportedScript(String),

    #[error("Transformation failed: {0}")]
    TransformationFailed(#[source] EngineError),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::TextTooLong { .. } => ErrorCode::TextTooLong,
            Self::InvalidLanguageCode(_) => ErrorCode::InvalidLanguageCode,
            Self::UnsupportedScript(_) => ErrorCode::UnsupportedScript,
            Self::TransformationFailed(_) => ErrorCode::TransformationFailed,
            Self::ParseError(_) => ErrorCode::ParseError,
            Self::UnknownTool(_) => ErrorCode::UnknownTool,
            Self::UnknownMethod(_) => ErrorCode::UnknownMethod,
            Self::UnknownResource(_) => ErrorCode::UnknownResource,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnsupportedScript(script) => Self::UnsupportedScript(script),
            other => Self::TransformationFailed(other),
        }
    }
}

/// Convert a service error into the wire error object.
///
/// Internal errors never expose their message; the cause is only carried,
/// truncated, in `details`.
impl From<ServiceError> for WireError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        match err {
            ServiceError::Internal(detail) => WireError::new(code, "Internal error")
                .with_details(Value::String(truncate(&detail, MAX_DETAIL_CHARS))),
            other => WireError::new(code, truncate(&other.to_string(), MAX_DETAIL_CHARS)),
        }
    }
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Shorten user text for logs.
pub fn elide(text: &str) -> String {
    truncate(text, ELIDED_TEXT_CHARS)
}
