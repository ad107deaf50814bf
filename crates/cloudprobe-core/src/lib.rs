//! Provider fan-out, response cache and extraction algebra.
//!
//! This crate supplies data to compliance checks:
//!
//! - Fan out one provider call over profiles × regions ([`FetchEngine`])
//! - Cache raw responses under a deterministic key ([`CallSignature`], [`ResponseCache`])
//! - Reshape nested responses into flat resource lists ([`ResultSet`])
//!
//! Provider SDKs plug in through [`ClientFactory`] / [`ProviderClient`].
//!
//! # Quick Start
//!
//! ```no_run
//! use cloudprobe_core::{listings, EngineConfig, FetchEngine};
//! # use cloudprobe_core::{ClientFactory, ProviderClient, ProviderError};
//! # struct Sdk;
//! # impl ClientFactory for Sdk {
//! #     fn connect(&self, _: Option<&str>, _: Option<&str>, _: &str)
//! #         -> Result<Box<dyn ProviderClient>, ProviderError> { unimplemented!() }
//! #     fn available_regions(&self, _: &str) -> Result<Vec<String>, ProviderError> { Ok(vec![]) }
//! # }
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut engine = FetchEngine::from_config(Sdk, EngineConfig::from_env())?;
//! let scope = listings::Scope::all().with_profiles(["audit-prod", "audit-stage"]);
//! for instance in listings::ec2_instances(&mut engine, &scope)? {
//!     println!("{}", instance);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod listings;
pub mod query;
pub mod signature;
pub mod store;
pub mod value;

pub use client::{merge_pages, ClientFactory, ClientRegistry, ProviderClient};
pub use config::{EngineConfig, GLOBAL_REGION, REGIONLESS_SERVICES};
pub use error::{CodecError, FetchError, FetchResult, ProviderError, QueryError, StoreError};
pub use fetch::{ErrorPolicy, FetchEngine, FetchRequest};
pub use query::ResultSet;
pub use signature::{CallSignature, Kwargs, CACHE_NAMESPACE};
pub use store::{CacheStats, CacheStore, MemoryStore, ResponseCache, SqliteStore};
pub use value::{Map, ResourceMeta, Value, META_KEY};
