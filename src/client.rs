//! Lifecycle owner for the romanization engine.
//!
//! The engine is initialized lazily on first use. The initialization future
//! itself is memoized, so callers that arrive while it is still running wait
//! on the same attempt rather than starting their own. A failed attempt is
//! terminal for the life of the process.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::cache::ResultCache;
use crate::engine::{EngineError, EngineHandle, OutputMode, RomanizationEngine, Transformed};
use crate::error::{elide, ServiceError};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;
const FAILED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

type InitOutcome = Result<Arc<dyn EngineHandle>, EngineError>;

pub struct TransformationClient {
    engine: Arc<dyn RomanizationEngine>,
    cache: Arc<ResultCache>,
    handle: OnceCell<InitOutcome>,
    state: AtomicU8,
}

impl TransformationClient {
    pub fn new(engine: Arc<dyn RomanizationEngine>, cache: Arc<ResultCache>) -> Self {
        Self {
            engine,
            cache,
            handle: OnceCell::new(),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn state(&self) -> ClientState {
        match self.state.load(Ordering::Acquire) {
            INITIALIZING => ClientState::Initializing,
            READY => ClientState::Ready,
            FAILED => ClientState::Failed,
            _ => ClientState::Uninitialized,
        }
    }

    /// Return the ready engine handle, initializing it on first call.
    ///
    /// All concurrent callers share one initialization; all of them observe
    /// the same handle or the same failure.
    pub async fn ensure_ready(&self) -> Result<Arc<dyn EngineHandle>, ServiceError> {
        match self.handle.get_or_init(|| self.initialize()).await {
            Ok(handle) => Ok(Arc::clone(handle)),
            Err(err) => Err(ServiceError::TransformationFailed(err.clone())),
        }
    }

    async fn initialize(&self) -> InitOutcome {
        self.state.store(INITIALIZING, Ordering::Release);
        tracing::info!(engine = self.engine.name(), "initializing romanization engine");

        let started = Instant::now();
        let outcome = self.engine.initialize(self.cache.max_size()).await;

        match &outcome {
            Ok(_) => {
                self.state.store(READY, Ordering::Release);
                tracing::info!(
                    engine = self.engine.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "romanization engine ready",
                );
            }
            Err(err) => {
                self.state.store(FAILED, Ordering::Release);
                tracing::error!(
                    engine = self.engine.name(),
                    error = %err,
                    "engine initialization failed; all further calls will fail",
                );
            }
        }

        outcome
    }

    /// Run one transformation on a ready handle.
    pub async fn transform(
        &self,
        handle: &dyn EngineHandle,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<Transformed, ServiceError> {
        handle
            .transform(text, language_code, mode)
            .await
            .map_err(|err| {
                tracing::warn!(
                    text = %elide(text),
                    language = language_code.unwrap_or("auto"),
                    mode = mode.as_str(),
                    error = %err,
                    "transformation failed",
                );
                ServiceError::from(err)
            })
    }

    /// `ensure_ready` followed by `transform`.
    pub async fn romanize(
        &self,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<Transformed, ServiceError> {
        let handle = self.ensure_ready().await?;
        self.transform(handle.as_ref(), text, language_code, mode).await
    }

    /// Clear the result cache and the engine's own cache, if it is running.
    ///
    /// Operational use only (e.g. after a data update).
    pub fn reset_cache(&self) {
        self.cache.clear();
        if let Some(Ok(handle)) = self.handle.get() {
            handle.reset_cache();
        }
        tracing::info!("result and engine caches cleared");
    }
}
