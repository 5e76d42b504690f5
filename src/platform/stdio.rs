use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::PlatformAdapter;
use crate::config::{Platform, ServerConfig};
use crate::engine::RomanizationEngine;
use crate::error::ServiceError;
use crate::handlers::{health, Dispatcher};
use crate::protocol::{Envelope, Method, WireResponse};
use crate::state::AppState;

/// Maximum bytes per JSON-RPC message (1 MiB).
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Newline-delimited JSON-RPC 2.0 over stdin/stdout, for local MCP clients.
///
/// Logs go to stderr; stdout carries protocol messages only.
pub struct StdioAdapter {
    dispatcher: Dispatcher,
    initialized: AtomicBool,
}

impl StdioAdapter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            dispatcher: Dispatcher::new(state),
            initialized: AtomicBool::new(false),
        }
    }

    /// Adapter with stdio ceilings applied to `config`.
    pub fn from_config(config: &ServerConfig, engine: Arc<dyn RomanizationEngine>) -> Self {
        Self::new(super::build_state(Platform::Stdio, config, engine))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub async fn run(&self) -> std::io::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve until `reader` reaches end of input.
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                tracing::warn!(bytes = n, limit = MAX_MESSAGE_BYTES, "message too large");
                let err = ServiceError::ParseError(format!("message exceeds {MAX_MESSAGE_BYTES} bytes"));
                write_line(&mut writer, &WireResponse::error(None, err.into()).to_json()).await?;
                continue;
            }

            if let Some(line) = self.handle(raw.clone()).await {
                write_line(&mut writer, &line).await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    async fn process(&self, raw: &[u8]) -> Option<WireResponse> {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(rejected) => return rejected.into_response(),
        };

        // Initialization gate: only `initialize` and `ping` before the handshake
        let method = envelope.method;
        if !self.is_initialized() && !matches!(method, Method::Initialize | Method::Ping) {
            if envelope.is_notification() {
                return None;
            }
            let err = ServiceError::InvalidInput("Server not initialized".to_string());
            return Some(WireResponse::error(envelope.id, err.into()));
        }

        let response = self.dispatcher.dispatch(envelope).await;

        if method == Method::Initialize && response.as_ref().is_some_and(|r| r.error.is_none()) {
            self.initialized.store(true, Ordering::Release);
            tracing::info!("client initialized");
        }

        response
    }
}

#[async_trait]
impl PlatformAdapter for StdioAdapter {
    /// One raw input line.
    type Request = Vec<u8>;
    /// The serialized reply line, if any.
    type Response = Option<String>;

    fn platform(&self) -> Platform {
        Platform::Stdio
    }

    async fn handle(&self, raw: Vec<u8>) -> Option<String> {
        let trimmed = match std::str::from_utf8(&raw) {
            Ok(s) => s.trim(),
            Err(_) => {
                let err = ServiceError::ParseError("message is not valid UTF-8".to_string());
                return Some(WireResponse::error(None, err.into()).to_json());
            }
        };
        if trimmed.is_empty() {
            return None;
        }
        self.process(trimmed.as_bytes()).await.map(|response| response.to_json())
    }

    async fn health_check(&self) -> Option<String> {
        serde_json::to_string(&health::report(self.dispatcher.state())).ok()
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
