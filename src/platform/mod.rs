//! Hosting adapters.
//!
//! An adapter turns its environment's native request into bytes for the
//! [`Dispatcher`], and the dispatcher's answer into a native response. Tool
//! logic never lives here; what differs between adapters is framing, status
//! codes, CORS, and the resource ceilings they build [`AppState`] with.

pub mod http;
pub mod lambda;
pub mod stdio;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{Platform, ServerConfig};
use crate::engine::RomanizationEngine;
use crate::error::ServiceError;
use crate::handlers::{health, Dispatcher};
use crate::protocol::{ErrorCode, WireError, WireResponse};
use crate::state::AppState;

pub use http::HttpAdapter;
pub use lambda::LambdaAdapter;
pub use stdio::StdioAdapter;

/// Permissive CORS headers attached to every HTTP-style response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
];

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    type Request: Send;
    type Response: Send;

    fn platform(&self) -> Platform;

    async fn handle(&self, request: Self::Request) -> Self::Response;

    async fn health_check(&self) -> Self::Response;
}

/// Shared state for an adapter on `platform`, with that platform's ceilings.
pub fn build_state(
    platform: Platform,
    config: &ServerConfig,
    engine: Arc<dyn RomanizationEngine>,
) -> Arc<AppState> {
    Arc::new(AppState::new(platform, config.limits(platform), engine))
}

/// Status code and optional JSON body, before native framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Option<String>,
}

impl HttpReply {
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }
}

/// Run a protocol request body through the dispatcher.
///
/// 204 for notifications, 400 for parse errors, 413 for bodies over
/// `max_body_bytes`, 200 for everything else (including tool errors).
pub async fn process_post(dispatcher: &Dispatcher, body: &[u8], max_body_bytes: usize) -> HttpReply {
    if body.len() > max_body_bytes {
        return payload_too_large(max_body_bytes);
    }

    match dispatcher.handle_raw(body).await {
        None => HttpReply::no_content(),
        Some(response) => {
            let status = match response.error_code() {
                Some(ErrorCode::ParseError) => 400,
                _ => 200,
            };
            HttpReply::json(status, response.to_json())
        }
    }
}

#[derive(Debug, Serialize)]
struct RestError {
    error: WireError,
}

/// Run a plain REST body through the dispatcher.
///
/// 200 with the result object; client mistakes are 400, engine failures
/// 422 and internal errors 500, each with an `{"error": ...}` body.
pub async fn process_rest(dispatcher: &Dispatcher, body: &[u8], max_body_bytes: usize) -> HttpReply {
    if body.len() > max_body_bytes {
        return payload_too_large(max_body_bytes);
    }

    match dispatcher.handle_rest(body).await {
        Ok(result) => HttpReply::json(200, result.to_string()),
        Err(err) => {
            let status = match err.code() {
                ErrorCode::UnsupportedScript | ErrorCode::TransformationFailed => 422,
                ErrorCode::InternalError => 500,
                _ => 400,
            };
            let body = RestError { error: err.into() };
            match serde_json::to_string(&body) {
                Ok(body) => HttpReply::json(status, body),
                Err(e) => internal_reply(&e.to_string()),
            }
        }
    }
}

pub fn payload_too_large(max_body_bytes: usize) -> HttpReply {
    let err = ServiceError::InvalidInput(format!("request body exceeds {max_body_bytes} bytes"));
    HttpReply::json(413, WireResponse::error(None, err.into()).to_json())
}

/// Health report; 503 once engine initialization has failed.
pub fn health_reply(state: &AppState) -> HttpReply {
    let report = health::report(state);
    let status = if report.status == "healthy" { 200 } else { 503 };
    match serde_json::to_string(&report) {
        Ok(body) => HttpReply::json(status, body),
        Err(e) => internal_reply(&e.to_string()),
    }
}

pub fn method_not_allowed(method: &str) -> HttpReply {
    let err = WireError::new(ErrorCode::InvalidInput, format!("Method {method} not allowed"));
    HttpReply::json(405, WireResponse::error(None, err).to_json())
}

pub fn not_found(path: &str) -> HttpReply {
    let err = WireError::new(ErrorCode::UnknownResource, format!("No route for {path}"));
    HttpReply::json(404, WireResponse::error(None, err).to_json())
}

fn internal_reply(detail: &str) -> HttpReply {
    let err = ServiceError::Internal(detail.to_string());
    HttpReply::json(500, WireResponse::error(None, err.into()).to_json())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Protocol,
    Rest,
    Health,
}

impl Endpoint {
    fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path.ends_with("/health") {
            Self::Health
        } else if path.ends_with("/romanize") {
            Self::Rest
        } else {
            Self::Protocol
        }
    }
}

/// Request routing for adapters that receive already-buffered HTTP-style
/// requests.
///
/// Such adapters sit behind a single gateway route, so paths are matched by
/// suffix: `.../health`, `.../romanize`, and anything else is the protocol
/// endpoint.
pub async fn route_http(dispatcher: &Dispatcher, method: &str, path: &str, body: &[u8]) -> HttpReply {
    let max_body_bytes = dispatcher.state().limits.max_body_bytes;
    match (method.to_ascii_uppercase().as_str(), Endpoint::from_path(path)) {
        ("OPTIONS", _) => HttpReply::no_content(),
        ("GET", Endpoint::Health) => health_reply(dispatcher.state()),
        ("POST", Endpoint::Protocol) => process_post(dispatcher, body, max_body_bytes).await,
        ("POST", Endpoint::Rest) => process_rest(dispatcher, body, max_body_bytes).await,
        (other, _) => method_not_allowed(other),
    }
}
