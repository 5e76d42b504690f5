use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::RpcId;
use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Wire response. Exactly one of `result` / `error` is set.
///
/// `id` is always serialized; it is `null` when the request id could not be
/// recovered (parse errors).
#[derive(Debug, Clone, Serialize)]
pub struct WireResponse {
    pub jsonrpc: &'static str,
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

impl WireResponse {
    pub fn success(id: Option<RpcId>, result: ToolResult) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: WireError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Serialize to a JSON string. Falls back to a fixed internal-error body
    /// so a response is always emitted.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "response serialization failed");
            FALLBACK_INTERNAL_ERROR.to_string()
        })
    }
}

pub const FALLBACK_INTERNAL_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":"internal_error","message":"Internal error"}}"#;

// ---------------------------------------------------------------------------
// Result payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Json,
}

/// Result payload: `{type, content}`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub content: Value,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            content: Value::String(text.into()),
        }
    }

    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ServiceError> {
        let content = serde_json::to_value(payload)
            .map_err(|e| ServiceError::Internal(format!("serialization failed: {e}")))?;
        Ok(Self {
            content_type: ContentType::Json,
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// Error payload
// ---------------------------------------------------------------------------

/// Stable machine-readable error code carried in every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    TextTooLong,
    InvalidLanguageCode,
    UnsupportedScript,
    TransformationFailed,
    ParseError,
    UnknownTool,
    UnknownMethod,
    UnknownResource,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::TextTooLong => "text_too_long",
            Self::InvalidLanguageCode => "invalid_language_code",
            Self::UnsupportedScript => "unsupported_script",
            Self::TransformationFailed => "transformation_failed",
            Self::ParseError => "parse_error",
            Self::UnknownTool => "unknown_tool",
            Self::UnknownMethod => "unknown_method",
            Self::UnknownResource => "unknown_resource",
            Self::InternalError => "internal_error",
        }
    }

    /// Errors raised while reading the envelope, before any tool logic runs.
    pub fn is_protocol_level(&self) -> bool {
        matches!(self, Self::ParseError | Self::UnknownMethod | Self::UnknownTool)
    }
}

/// Error object: `{code, message, details?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl WireError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
