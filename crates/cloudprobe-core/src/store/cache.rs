//! Codec-aware cache facade over a [`CacheStore`].
//!
//! Store failures are soft: a failed read is a miss, a failed write keeps the
//! value in memory for the rest of the run without persisting it.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{CacheStore, MemoryStore};
use crate::codec;
use crate::value::Value;

/// Counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub read_failures: u64,
    pub write_failures: u64,
}

/// Response cache used by the fetch engine.
pub struct ResponseCache {
    store: Box<dyn CacheStore>,
    /// Values whose write to `store` failed.
    unpersisted: HashMap<String, Value>,
    stats: CacheStats,
    trace: bool,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("unpersisted", &self.unpersisted.len())
            .field("stats", &self.stats)
            .field("trace", &self.trace)
            .finish()
    }
}

impl ResponseCache {
    pub fn new(store: impl CacheStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            unpersisted: HashMap::new(),
            stats: CacheStats::default(),
            trace: false,
        }
    }

    /// Cache backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Emit a debug event for every hit and miss.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up `key`. Store and decode failures are reported as misses.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.unpersisted.get(key) {
            self.stats.hits += 1;
            if self.trace {
                debug!(key, source = "memory", "cache hit");
            }
            return Some(value.clone());
        }

        let document = match self.store.get(key) {
            Ok(Some(document)) => document,
            Ok(None) => {
                self.stats.misses += 1;
                if self.trace {
                    debug!(key, "cache miss");
                }
                return None;
            }
            Err(e) => {
                self.stats.read_failures += 1;
                self.stats.misses += 1;
                warn!(key, error = %e, "cache read failed; treating as miss");
                return None;
            }
        };

        match codec::decode(&document) {
            Ok(value) => {
                self.stats.hits += 1;
                if self.trace {
                    debug!(key, source = "store", "cache hit");
                }
                Some(value)
            }
            Err(e) => {
                self.stats.read_failures += 1;
                self.stats.misses += 1;
                warn!(key, error = %e, "undecodable cache entry; treating as miss");
                None
            }
        }
    }

    /// Store `value` under `key`. Never fails; see module docs.
    pub fn put(&mut self, key: &str, value: &Value) {
        let result = codec::encode(value)
            .map_err(crate::error::StoreError::from)
            .and_then(|document| self.store.set(key, &document));

        match result {
            Ok(()) => {
                self.stats.writes += 1;
                self.unpersisted.remove(key);
                if self.trace {
                    debug!(key, "cache write");
                }
            }
            Err(e) => {
                self.stats.write_failures += 1;
                warn!(key, error = %e, "cache write failed; keeping value in memory only");
                self.unpersisted.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Drop every entry from the backing store and from memory.
    pub fn clear(&mut self) -> crate::error::StoreResult<()> {
        self.unpersisted.clear();
        self.store.clear()
    }
}
