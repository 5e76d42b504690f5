pub mod detect_script;
pub mod health;
pub mod resources;
pub mod rest;
pub mod romanize;
pub mod romanize_batch;

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::engine::OutputMode;
use crate::error::ServiceError;
use crate::protocol::{Envelope, Method, ToolResult, WireResponse};
use crate::schema::{self, TOOL_DETECT_SCRIPT, TOOL_ROMANIZE, TOOL_ROMANIZE_BATCH};
use crate::state::AppState;

/// MCP protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Earlier clients call the single-text tool by this name.
const LEGACY_ROMANIZE_TOOL: &str = "romanize_text";

/// Routes canonical envelopes to tool handlers and shapes wire responses.
///
/// Holds no tool logic of its own beyond routing; adapters hold none at all.
#[derive(Clone)]
pub struct Dispatcher {
    state: Arc<AppState>,
}

impl Dispatcher {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Parse a raw request body and dispatch it.
    ///
    /// Returns `None` for notifications (no response required).
    pub async fn handle_raw(&self, raw: &[u8]) -> Option<WireResponse> {
        match Envelope::parse(raw) {
            Ok(envelope) => self.dispatch(envelope).await,
            Err(rejected) => rejected.into_response(),
        }
    }

    /// Dispatch one envelope.
    ///
    /// The handler runs on its own task: a panic inside tool code comes back
    /// as a `JoinError` and is reported as `internal_error`.
    pub async fn dispatch(&self, envelope: Envelope) -> Option<WireResponse> {
        let id = envelope.id.clone();
        let notification = envelope.is_notification();
        let method = envelope.method;
        let tool = envelope.tool_name.clone();
        let started = Instant::now();

        let state = Arc::clone(&self.state);
        let outcome = match tokio::spawn(async move { route(envelope, &state).await }).await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                tracing::error!(method = method.as_str(), error = %join_err, "request handler aborted");
                Err(ServiceError::Internal(join_err.to_string()))
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::debug!(method = method.as_str(), tool = ?tool, elapsed_ms, "request handled"),
            Err(err) if err.code().is_protocol_level() => {
                tracing::warn!(method = method.as_str(), tool = ?tool, error = %err, "protocol error")
            }
            Err(err) => tracing::info!(method = method.as_str(), tool = ?tool, error = %err, elapsed_ms, "request failed"),
        }

        if notification {
            return None;
        }

        Some(match outcome {
            Ok(result) => WireResponse::success(id, result),
            Err(err) => WireResponse::error(id, err.into()),
        })
    }

    /// Handle a body for the plain REST endpoint, with the same panic
    /// isolation as [`Dispatcher::dispatch`].
    pub async fn handle_rest(&self, raw: &[u8]) -> Result<Value, ServiceError> {
        let body: Value = serde_json::from_slice(raw)
            .map_err(|e| ServiceError::ParseError(format!("invalid JSON: {e}")))?;
        if !body.is_object() {
            return Err(ServiceError::InvalidInput("expected a JSON object".to_string()));
        }
        let request: rest::RestRequest = serde_json::from_value(body)
            .map_err(|e| ServiceError::InvalidInput(format!("invalid request body: {e}")))?;

        let state = Arc::clone(&self.state);
        let outcome = match tokio::spawn(async move { rest::handle(request, &state).await }).await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                tracing::error!(error = %join_err, "rest handler aborted");
                Err(ServiceError::Internal(join_err.to_string()))
            }
        };
        if let Err(err) = &outcome {
            tracing::info!(error = %err, "rest request failed");
        }
        outcome
    }

    /// Romanize a few common greetings so the engine and cache are warm
    /// before the first real request. Failures are logged and ignored.
    pub async fn prewarm(&self) -> usize {
        let mut warmed = 0;
        for (text, lang) in PREWARM_SAMPLES {
            match romanize::romanize_one(text, lang, OutputMode::Plain, &self.state).await {
                Ok(_) => warmed += 1,
                Err(err) => tracing::warn!(text, error = %err, "prewarm romanization failed"),
            }
        }
        tracing::info!(warmed, total = PREWARM_SAMPLES.len(), "result cache prewarmed");
        warmed
    }
}

const PREWARM_SAMPLES: [(&str, Option<&str>); 5] = [
    ("Hello", None),
    ("Привет", Some("rus")),
    ("你好", Some("zho")),
    ("مرحبا", Some("ara")),
    ("नमस्ते", Some("hin")),
];

async fn route(envelope: Envelope, state: &AppState) -> Result<ToolResult, ServiceError> {
    match envelope.method {
        Method::Initialize => ToolResult::json(&json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": "uroman-mcp-server",
                "version": env!("CARGO_PKG_VERSION")
            }
        })),

        Method::Initialized => Ok(ToolResult::text("")),

        Method::Ping => Ok(ToolResult::text("pong")),

        Method::ListTools => ToolResult::json(&schema::tool_catalog(&state.limits)),

        Method::CallTool => {
            let name = envelope.tool_name.unwrap_or_default();
            dispatch_tool_call(&name, envelope.arguments, state).await
        }

        Method::ListResources => resources::list(),

        Method::ReadResource => {
            let uri = envelope.resource_uri.unwrap_or_default();
            resources::read(&uri, state)
        }
    }
}

async fn dispatch_tool_call(name: &str, arguments: Value, state: &AppState) -> Result<ToolResult, ServiceError> {
    match name {
        TOOL_ROMANIZE | LEGACY_ROMANIZE_TOOL => {
            romanize::handle(parse_arguments(name, arguments)?, state).await
        }
        TOOL_ROMANIZE_BATCH => romanize_batch::handle(parse_arguments(name, arguments)?, state).await,
        TOOL_DETECT_SCRIPT => detect_script::handle(parse_arguments(name, arguments)?, state).await,
        _ => Err(ServiceError::UnknownTool(name.to_string())),
    }
}

fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ServiceError> {
    serde_json::from_value(arguments)
        .map_err(|e| ServiceError::InvalidInput(format!("invalid arguments for {tool}: {e}")))
}
