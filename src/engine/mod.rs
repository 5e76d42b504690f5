//! Interface to the external romanization engine.
//!
//! The service never looks inside the engine: it initializes it once,
//! hands it text, and gets back either a plain string or an annotated JSON
//! structure. Everything about scripts, tables and rules lives behind
//! [`EngineHandle::transform`].

pub mod process;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use process::ProcessEngine;

/// Requested output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Plain,
    Annotated,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Annotated => "annotated",
        }
    }
}

/// Engine output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transformed {
    Plain(String),
    Annotated(Value),
}

impl Transformed {
    /// Flatten to a string; annotated output is rendered as compact JSON.
    pub fn into_text(self) -> String {
        match self {
            Self::Plain(text) => text,
            Self::Annotated(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine failed: {0}")]
    Failed(String),

    #[error("script not supported by engine: {0}")]
    UnsupportedScript(String),
}

/// Factory side of the engine: performs the expensive one-time setup.
#[async_trait]
pub trait RomanizationEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn initialize(&self, cache_size_hint: usize) -> Result<Arc<dyn EngineHandle>, EngineError>;
}

/// A ready engine instance.
#[async_trait]
pub trait EngineHandle: Send + Sync {
    async fn transform(
        &self,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<Transformed, EngineError>;

    /// Drop any memoized state the engine keeps internally.
    fn reset_cache(&self);
}
