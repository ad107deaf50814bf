//! Response cache and its backing stores.
//!
//! # Layout
//!
//! ```text
//! ResponseCache            codec + soft-failure handling + stats
//!   └── dyn CacheStore     key → JSON document
//!         ├── SqliteStore  persistent, one row per key
//!         └── MemoryStore  in-process
//! ```
//!
//! The store is a plain last-write-wins key/value map. Nothing here
//! invalidates entries; `remove`/`clear` exist for out-of-band maintenance.

mod cache;
mod memory;
mod sqlite;

pub use cache::{CacheStats, ResponseCache};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreResult;

/// Key/value storage for encoded cache documents.
pub trait CacheStore {
    /// Read the document stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `document` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, document: &str) -> StoreResult<()>;

    /// Remove a single key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Remove every key.
    fn clear(&mut self) -> StoreResult<()>;
}

impl<S: CacheStore + ?Sized> CacheStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, document: &str) -> StoreResult<()> {
        (**self).set(key, document)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> StoreResult<()> {
        (**self).clear()
    }
}
