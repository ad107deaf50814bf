//! Provider client adapter seam.
//!
//! Provider SDK bindings live outside this crate. They plug in through two
//! traits:
//!
//! - [`ClientFactory`] builds a [`ProviderClient`] for one
//!   `(profile, region, service)` and discovers regions.
//! - [`ProviderClient`] performs calls, optionally paginating.
//!
//! [`ClientRegistry`] keeps exactly one client per `(profile, region, service)`
//! for the lifetime of the registry.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ProviderError;
use crate::signature::Kwargs;
use crate::value::Value;

/// Fields providers use to thread pagination state. Dropped when merging pages.
pub const PAGINATION_FIELDS: &[&str] = &[
    "NextToken",
    "nextToken",
    "Marker",
    "NextMarker",
    "IsTruncated",
    "ContinuationToken",
    "NextContinuationToken",
    "NextPageToken",
    "nextPageToken",
];

/// A client bound to one profile, region and service.
pub trait ProviderClient {
    /// Perform a single call.
    fn call(&self, method: &str, args: &[String], kwargs: &Kwargs) -> Result<Value, ProviderError>;

    /// Whether `method` returns paged results.
    fn supports_pagination(&self, method: &str) -> bool {
        let _ = method;
        false
    }

    /// Fetch every page of `method` and merge them into one response.
    ///
    /// The default implementation issues a single call; adapters with real
    /// paginators override it (see [`merge_pages`]).
    fn paginate(
        &self,
        method: &str,
        args: &[String],
        kwargs: &Kwargs,
    ) -> Result<Value, ProviderError> {
        self.call(method, args, kwargs)
    }
}

/// Constructs provider clients and answers region discovery.
pub trait ClientFactory {
    fn connect(
        &self,
        profile: Option<&str>,
        region: Option<&str>,
        service: &str,
    ) -> Result<Box<dyn ProviderClient>, ProviderError>;

    /// Regions in which `service` is available, in provider order.
    fn available_regions(&self, service: &str) -> Result<Vec<String>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    profile: Option<String>,
    region: Option<String>,
    service: String,
}

/// One client per `(profile, region, service)`, created on first use.
pub struct ClientRegistry<F> {
    factory: F,
    clients: HashMap<ClientKey, Box<dyn ProviderClient>>,
}

impl<F: ClientFactory> ClientRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            clients: HashMap::new(),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Number of clients constructed so far.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Get the client for this triple, connecting on first use.
    pub fn client(
        &mut self,
        profile: Option<&str>,
        region: Option<&str>,
        service: &str,
    ) -> Result<&dyn ProviderClient, ProviderError> {
        let key = ClientKey {
            profile: profile.map(String::from),
            region: region.map(String::from),
            service: service.to_string(),
        };

        if !self.clients.contains_key(&key) {
            debug!(?profile, ?region, service, "connecting provider client");
            let client = self.factory.connect(profile, region, service)?;
            self.clients.insert(key.clone(), client);
        }

        Ok(self.clients[&key].as_ref())
    }

    pub fn available_regions(&self, service: &str) -> Result<Vec<String>, ProviderError> {
        self.factory.available_regions(service)
    }
}

/// Merge paged responses into one.
///
/// Array fields are concatenated in page order, nested objects are merged
/// recursively, other fields keep their first-seen value. Pagination tokens
/// ([`PAGINATION_FIELDS`]) are dropped.
pub fn merge_pages(pages: impl IntoIterator<Item = Value>) -> Value {
    let mut merged = Value::object();
    for page in pages {
        merge_into(&mut merged, page);
    }
    if let Some(map) = merged.as_object_mut() {
        for field in PAGINATION_FIELDS {
            map.remove(*field);
        }
    }
    merged
}

fn merge_into(acc: &mut Value, page: Value) {
    let (Some(acc_map), Value::Object(page_map)) = (acc.as_object_mut(), page) else {
        return;
    };
    for (key, value) in page_map {
        match (acc_map.get_mut(&key), value) {
            (None, value) => {
                acc_map.insert(key, value);
            }
            (Some(Value::Array(existing)), Value::Array(more)) => existing.extend(more),
            (Some(existing @ Value::Object(_)), value @ Value::Object(_)) => {
                merge_into(existing, value)
            }
            (Some(_), _) => {}
        }
    }
}
