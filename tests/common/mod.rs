//! Shared fixtures: an in-process engine double and state builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use uroman_mcp_server::config::{Limits, Platform};
use uroman_mcp_server::engine::{EngineError, EngineHandle, OutputMode, RomanizationEngine, Transformed};
use uroman_mcp_server::handlers::Dispatcher;
use uroman_mcp_server::protocol::WireResponse;
use uroman_mcp_server::state::AppState;

/// Input that makes the fake engine panic mid-transform.
pub const PANIC_TEXT: &str = "__panic__";

/// Input the fake engine reports as an unsupported script.
pub const UNSUPPORTED_TEXT: &str = "𓀀𓀁";

const WORDS: &[(&str, &str)] = &[
    ("Привет", "Privet"),
    ("мир", "mir"),
    ("你好", "nihao"),
    ("مرحبا", "mrhba"),
    ("नमस्ते", "namaste"),
    ("Київ", "Kyiv"),
];

#[derive(Debug, Default)]
pub struct Counters {
    pub inits: AtomicUsize,
    pub transforms: AtomicUsize,
    pub resets: AtomicUsize,
}

impl Counters {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn transforms(&self) -> usize {
        self.transforms.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

/// Deterministic engine double with word-level romanization.
#[derive(Clone, Default)]
pub struct FakeEngine {
    counters: Arc<Counters>,
    init_delay: Duration,
    fail_init: bool,
    failing_texts: Vec<String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing_texts.push(text.to_string());
        self
    }

    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl RomanizationEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    async fn initialize(&self, _cache_size_hint: usize) -> Result<Arc<dyn EngineHandle>, EngineError> {
        self.counters.inits.fetch_add(1, Ordering::SeqCst);
        if !self.init_delay.is_zero() {
            tokio::time::sleep(self.init_delay).await;
        }
        if self.fail_init {
            return Err(EngineError::Unavailable("tables missing".into()));
        }
        Ok(Arc::new(FakeHandle {
            counters: Arc::clone(&self.counters),
            failing_texts: self.failing_texts.clone(),
        }))
    }
}

struct FakeHandle {
    counters: Arc<Counters>,
    failing_texts: Vec<String>,
}

#[async_trait]
impl EngineHandle for FakeHandle {
    async fn transform(
        &self,
        text: &str,
        language_code: Option<&str>,
        mode: OutputMode,
    ) -> Result<Transformed, EngineError> {
        self.counters.transforms.fetch_add(1, Ordering::SeqCst);

        if text == PANIC_TEXT {
            panic!("fake engine exploded");
        }
        if text == UNSUPPORTED_TEXT {
            return Err(EngineError::UnsupportedScript("Egyptian hieroglyphs".into()));
        }
        if self.failing_texts.iter().any(|t| t == text) {
            return Err(EngineError::Failed(format!("cannot romanize {text:?}")));
        }

        let romanized = romanize_words(text);
        Ok(match mode {
            OutputMode::Plain => Transformed::Plain(romanized),
            OutputMode::Annotated => Transformed::Annotated(json!([{
                "start": 0,
                "end": text.chars().count(),
                "romanized": romanized,
                "language": language_code,
            }])),
        })
    }

    fn reset_cache(&self) {
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn romanize_words(text: &str) -> String {
    WORDS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

pub fn state_with(engine: FakeEngine, platform: Platform) -> Arc<AppState> {
    Arc::new(AppState::new(platform, Limits::for_platform(platform), Arc::new(engine)))
}

pub fn state_with_limits(engine: FakeEngine, limits: Limits) -> Arc<AppState> {
    Arc::new(AppState::new(Platform::Http, limits, Arc::new(engine)))
}

pub fn dispatcher(engine: FakeEngine) -> Dispatcher {
    Dispatcher::new(state_with(engine, Platform::Http))
}

pub fn tool_call(id: i64, name: &str, arguments: Value) -> Vec<u8> {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
    .into_bytes()
}

pub fn request(id: i64, method: &str, params: Value) -> Vec<u8> {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
        .to_string()
        .into_bytes()
}

/// Dispatch raw bytes and return the response as JSON.
pub async fn call(dispatcher: &Dispatcher, raw: &[u8]) -> Value {
    let response: WireResponse = dispatcher
        .handle_raw(raw)
        .await
        .expect("expected a response");
    serde_json::from_str(&response.to_json()).unwrap()
}

pub fn error_code(response: &Value) -> &str {
    response["error"]["code"].as_str().unwrap_or("<none>")
}
