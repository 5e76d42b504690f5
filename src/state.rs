use std::sync::Arc;

use crate::cache::ResultCache;
use crate::client::TransformationClient;
use crate::config::{Limits, Platform};
use crate::engine::RomanizationEngine;

/// Components shared by every request an adapter serves.
///
/// Built once per adapter and passed by reference; the cache and client are
/// the only process-wide mutable state.
pub struct AppState {
    pub platform: Platform,
    pub limits: Limits,
    pub cache: Arc<ResultCache>,
    pub client: Arc<TransformationClient>,
}

impl AppState {
    pub fn new(platform: Platform, limits: Limits, engine: Arc<dyn RomanizationEngine>) -> Self {
        let cache = Arc::new(ResultCache::new(limits.cache_size));
        let client = Arc::new(TransformationClient::new(engine, Arc::clone(&cache)));

        tracing::debug!(
            platform = platform.as_str(),
            cache_size = limits.cache_size,
            max_batch_size = limits.max_batch_size,
            max_text_length = limits.max_text_length,
            "application state created",
        );

        Self {
            platform,
            limits,
            cache,
            client,
        }
    }
}
