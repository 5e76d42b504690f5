use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use super::{HttpReply, PlatformAdapter, CORS_HEADERS, JSON_CONTENT_TYPE};
use crate::config::{Platform, ServerConfig};
use crate::engine::RomanizationEngine;
use crate::handlers::Dispatcher;
use crate::state::AppState;

/// Long-running HTTP server adapter.
#[derive(Clone)]
pub struct HttpAdapter {
    dispatcher: Dispatcher,
    router: Router,
}

impl HttpAdapter {
    pub fn new(state: Arc<AppState>) -> Self {
        let dispatcher = Dispatcher::new(state);
        let router = build_router(dispatcher.clone());
        Self { dispatcher, router }
    }

    /// Adapter with HTTP ceilings applied to `config`.
    pub fn from_config(config: &ServerConfig, engine: Arc<dyn RomanizationEngine>) -> Self {
        Self::new(super::build_state(Platform::Http, config, engine))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "server listening");
        }
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

#[async_trait]
impl PlatformAdapter for HttpAdapter {
    type Request = Request;
    type Response = Response;

    fn platform(&self) -> Platform {
        Platform::Http
    }

    async fn handle(&self, request: Request) -> Response {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    async fn health_check(&self) -> Response {
        with_cors(into_response(super::health_reply(self.dispatcher.state())))
    }
}

fn build_router(dispatcher: Dispatcher) -> Router {
    let max_body_bytes = dispatcher.state().limits.max_body_bytes;

    Router::new()
        .route("/", post(rpc_handler).fallback(method_not_allowed_handler))
        .route("/romanize", post(rest_handler).fallback(method_not_allowed_handler))
        .route("/health", get(health_handler).fallback(method_not_allowed_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

/// POST / - JSON-RPC endpoint
async fn rpc_handler(
    State(dispatcher): State<Dispatcher>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let max_body_bytes = dispatcher.state().limits.max_body_bytes;
    let reply = match body {
        Ok(bytes) => super::process_post(&dispatcher, &bytes, max_body_bytes).await,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(limit = max_body_bytes, "request body too large");
            super::payload_too_large(max_body_bytes)
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable request body");
            super::process_post(&dispatcher, &[], max_body_bytes).await
        }
    };
    into_response(reply)
}

/// POST /romanize - plain `{text}` / `{texts}` endpoint
async fn rest_handler(
    State(dispatcher): State<Dispatcher>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let max_body_bytes = dispatcher.state().limits.max_body_bytes;
    let reply = match body {
        Ok(bytes) => super::process_rest(&dispatcher, &bytes, max_body_bytes).await,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(limit = max_body_bytes, "request body too large");
            super::payload_too_large(max_body_bytes)
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unreadable request body");
            super::process_rest(&dispatcher, &[], max_body_bytes).await
        }
    };
    into_response(reply)
}

/// GET /health - Liveness probe with cache statistics
async fn health_handler(State(dispatcher): State<Dispatcher>) -> Response {
    into_response(super::health_reply(dispatcher.state()))
}

async fn method_not_allowed_handler(method: Method) -> Response {
    into_response(super::method_not_allowed(method.as_str()))
}

async fn not_found_handler(uri: Uri) -> Response {
    into_response(super::not_found(uri.path()))
}

/// Answers preflight requests and decorates every other response.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return with_cors(StatusCode::NO_CONTENT.into_response());
    }
    with_cors(next.run(request).await)
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

fn into_response(reply: HttpReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match reply.body {
        Some(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            Body::from(body),
        )
            .into_response(),
        None => status.into_response(),
    }
}
