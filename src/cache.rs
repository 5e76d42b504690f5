//! Fixed-capacity result cache with insertion-order eviction.
//!
//! Entries are evicted oldest-inserted-first. Reads never refresh an entry's
//! position, and overwriting an existing key keeps its original slot in the
//! eviction queue.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::engine::OutputMode;

/// Separates the fingerprint fields. Language code and mode have fixed
/// shapes, so reading the key from the right is unambiguous even if the
/// text itself contains the separator.
pub const FINGERPRINT_SEPARATOR: char = '\u{1f}';

/// Language placeholder used when no hint is given.
pub const AUTO_LANGUAGE: &str = "auto";

/// Build the cache key for a (text, language hint, output mode) triple.
pub fn fingerprint(text: &str, language_code: Option<&str>, mode: OutputMode) -> String {
    let language = language_code.unwrap_or(AUTO_LANGUAGE);
    let mut key = String::with_capacity(text.len() + language.len() + 12);
    key.push_str(text);
    key.push(FINGERPRINT_SEPARATOR);
    key.push_str(language);
    key.push(FINGERPRINT_SEPARATOR);
    key.push_str(mode.as_str());
    key
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

#[derive(Debug)]
pub struct ResultCache {
    inner: Mutex<CacheInner>,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl ResultCache {
    /// A cache holding at most `max_size` entries. `0` disables storing.
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_size,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = self.lock().entries.get(key).cloned();
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    /// Presence check that does not touch hit/miss counters.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn put(&self, key: String, value: String) {
        if self.max_size == 0 {
            return;
        }

        let mut inner = self.lock();

        if let Some(slot) = inner.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        while inner.entries.len() >= self.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                    tracing::trace!(size = inner.entries.len(), "evicted oldest cache entry");
                }
                None => break,
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, value);
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            size: self.len(),
            max_size: self.max_size,
            hits,
            misses,
            hit_rate: if lookups == 0 { 0.0 } else { hits as f64 / lookups as f64 },
        }
    }

    // Lock poisoning is ignored; no mutation panics between the map and
    // queue updates.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
