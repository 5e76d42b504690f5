use serde::Serialize;

use crate::cache::CacheStats;
use crate::client::ClientState;
use crate::config::{Limits, Platform};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub platform: Platform,
    pub engine: EngineStatus,
    pub cache: CacheStats,
    pub limits: Limits,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub name: String,
    pub state: ClientState,
}

/// Liveness plus cache statistics.
///
/// An engine that has not been initialized yet is still healthy; only a
/// failed initialization is reported as unhealthy.
pub fn report(state: &AppState) -> HealthReport {
    let engine_state = state.client.state();
    HealthReport {
        status: if engine_state == ClientState::Failed { "unhealthy" } else { "healthy" },
        version: env!("CARGO_PKG_VERSION"),
        platform: state.platform,
        engine: EngineStatus {
            name: state.client.engine_name().to_string(),
            state: engine_state,
        },
        cache: state.cache.stats(),
        limits: state.limits,
    }
}
