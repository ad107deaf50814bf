//! Engine configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CLOUDPROBE_CACHE_PATH` | SQLite cache file (default: `<user cache dir>/cloudprobe/cache.sqlite3`) |
//! | `CLOUDPROBE_OFFLINE` | Never call providers; misses yield empty responses |
//! | `CLOUDPROBE_DEBUG_CALLS` | Log every provider call and recovered error |
//! | `CLOUDPROBE_DEBUG_CACHE` | Log cache hits and misses |
//! | `CLOUDPROBE_DEFAULT_REGION` | Region used when discovery yields nothing (default: `us-east-1`) |

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::store::{ResponseCache, SqliteStore};

/// Canonical region for services without a regional concept.
pub const GLOBAL_REGION: &str = "us-east-1";

/// Services whose calls are region-independent.
pub const REGIONLESS_SERVICES: &[&str] =
    &["iam", "s3", "route53", "cloudfront", "organizations", "sts"];

fn default_region() -> String {
    GLOBAL_REGION.to_string()
}

/// Fetch engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite cache location. `None` keeps the cache in memory.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Serve cache hits only; misses become empty objects.
    #[serde(default)]
    pub offline: bool,

    /// Debug-log provider calls and recovered errors.
    #[serde(default)]
    pub debug_calls: bool,

    /// Debug-log cache hits and misses.
    #[serde(default)]
    pub debug_cache: bool,

    /// Fallback when region discovery returns nothing.
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_path: None,
            offline: false,
            debug_calls: false,
            debug_cache: false,
            default_region: default_region(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// `<user cache dir>/cloudprobe/cache.sqlite3`, if a cache or home dir exists.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("cloudprobe").join("cache.sqlite3"))
}

impl EngineConfig {
    /// Configuration from `CLOUDPROBE_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            cache_path: std::env::var("CLOUDPROBE_CACHE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(default_cache_path),
            offline: env_flag("CLOUDPROBE_OFFLINE"),
            debug_calls: env_flag("CLOUDPROBE_DEBUG_CALLS"),
            debug_cache: env_flag("CLOUDPROBE_DEBUG_CACHE"),
            default_region: std::env::var("CLOUDPROBE_DEFAULT_REGION")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_region),
        }
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_debug_calls(mut self, debug: bool) -> Self {
        self.debug_calls = debug;
        self
    }

    pub fn with_debug_cache(mut self, debug: bool) -> Self {
        self.debug_cache = debug;
        self
    }

    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Open the response cache this configuration describes.
    pub fn open_cache(&self) -> anyhow::Result<ResponseCache> {
        let cache = match &self.cache_path {
            Some(path) => {
                let store = SqliteStore::open(path)
                    .with_context(|| format!("failed to open cache at {}", path.display()))?;
                ResponseCache::new(store)
            }
            None => ResponseCache::in_memory(),
        };
        Ok(cache.with_trace(self.debug_cache))
    }
}

/// Whether `service` ignores regions.
pub fn is_regionless(service: &str) -> bool {
    REGIONLESS_SERVICES.contains(&service)
}
