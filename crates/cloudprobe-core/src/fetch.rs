//! Profile × region fan-out with response caching.
//!
//! For every `(profile, region)` pair, in profile-major order:
//!
//! 1. build the [`CallSignature`] and its cache key
//! 2. cache hit → use the cached value as-is
//! 3. miss → call the provider (paginating when the client supports it)
//! 4. provider error → abort, or substitute via the caller's error policy
//! 5. revive timestamp strings and write the response (or substitute) to
//!    the cache
//! 6. attach `__meta {profile, region}` and yield it with its signature
//!
//! Calls are strictly sequential. There are no retries.

use tracing::debug;

use crate::client::{ClientFactory, ClientRegistry};
use crate::codec;
use crate::config::{is_regionless, EngineConfig, GLOBAL_REGION};
use crate::error::{FetchError, FetchResult, ProviderError};
use crate::query::ResultSet;
use crate::signature::{CallSignature, Kwargs};
use crate::store::ResponseCache;
use crate::value::{ResourceMeta, Value};

/// Recovery callback: turns a provider error into a substitute response.
pub type ErrorPolicy<'a> = &'a dyn Fn(&ProviderError, &CallSignature) -> Value;

/// One logical query to fan out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub service: String,
    pub method: String,
    pub args: Vec<String>,
    pub kwargs: Kwargs,
    /// `None` means the current credentials only.
    pub profiles: Option<Vec<String>>,
    /// `None` means every discovered region.
    pub regions: Option<Vec<String>>,
}

impl FetchRequest {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            args: Vec::new(),
            kwargs: Kwargs::new(),
            profiles: None,
            regions: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.push(name, value);
        self
    }

    pub fn kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = Some(profiles.into_iter().map(Into::into).collect());
        self
    }

    pub fn regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }
}

/// The fan-out engine. Owns the client registry and the response cache.
pub struct FetchEngine<F> {
    clients: ClientRegistry<F>,
    cache: ResponseCache,
    config: EngineConfig,
}

impl<F: ClientFactory> FetchEngine<F> {
    pub fn new(clients: ClientRegistry<F>, cache: ResponseCache, config: EngineConfig) -> Self {
        Self {
            clients,
            cache,
            config,
        }
    }

    /// Build an engine whose cache is opened from `config`.
    pub fn from_config(factory: F, config: EngineConfig) -> anyhow::Result<Self> {
        let cache = config.open_cache()?;
        Ok(Self::new(ClientRegistry::new(factory), cache, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResponseCache {
        &mut self.cache
    }

    pub fn clients(&self) -> &ClientRegistry<F> {
        &self.clients
    }

    /// Run `request` for every profile × region and collect the responses.
    ///
    /// Without `on_error`, the first provider error aborts the whole fetch.
    pub fn fetch(
        &mut self,
        request: &FetchRequest,
        on_error: Option<ErrorPolicy<'_>>,
    ) -> FetchResult<Vec<(Value, CallSignature)>> {
        let profiles: Vec<Option<String>> = match &request.profiles {
            Some(profiles) if !profiles.is_empty() => profiles.iter().cloned().map(Some).collect(),
            _ => vec![None],
        };
        let regions = self.resolve_regions(request)?;

        let mut out = Vec::with_capacity(profiles.len() * regions.len());
        for profile in &profiles {
            for region in &regions {
                let signature = CallSignature::new(
                    profile.as_deref(),
                    Some(region.as_str()),
                    request.service.clone(),
                    request.method.clone(),
                    request.args.clone(),
                    request.kwargs.clone(),
                );
                let mut response = self.fetch_one(&signature, on_error)?;
                response.set_meta(&ResourceMeta::new(profile.as_deref(), Some(region.as_str())));
                out.push((response, signature));
            }
        }
        Ok(out)
    }

    /// [`fetch`](Self::fetch) wrapped as a [`ResultSet`] for extraction.
    pub fn query(
        &mut self,
        request: &FetchRequest,
        on_error: Option<ErrorPolicy<'_>>,
    ) -> FetchResult<ResultSet> {
        Ok(ResultSet::from_responses(self.fetch(request, on_error)?))
    }

    fn resolve_regions(&self, request: &FetchRequest) -> FetchResult<Vec<String>> {
        if is_regionless(&request.service) {
            return Ok(vec![GLOBAL_REGION.to_string()]);
        }
        if let Some(regions) = request.regions.as_ref().filter(|r| !r.is_empty()) {
            return Ok(regions.clone());
        }

        let discovered = self
            .clients
            .available_regions(&request.service)
            .map_err(|source| FetchError::Discovery {
                service: request.service.clone(),
                source,
            })?;
        if discovered.is_empty() {
            return Ok(vec![self.config.default_region.clone()]);
        }
        Ok(discovered)
    }

    fn fetch_one(
        &mut self,
        signature: &CallSignature,
        on_error: Option<ErrorPolicy<'_>>,
    ) -> FetchResult<Value> {
        let key = signature.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        if self.config.offline {
            debug!(%signature, "offline: skipping provider call");
            return Ok(Value::object());
        }

        let response = match self.call_provider(signature)? {
            Ok(response) => response,
            Err(err) => match on_error {
                None => return Err(err.into()),
                Some(policy) => {
                    if self.config.debug_calls {
                        debug!(%signature, code = %err.code, error = %err.message, "provider error recovered");
                    }
                    policy(&err, signature)
                }
            },
        };

        // Same shape as a later cache hit.
        let response = codec::normalize(response);
        self.cache.put(&key, &response);
        Ok(response)
    }

    /// Outer error: the client could not be built. Inner error: the call failed.
    fn call_provider(
        &mut self,
        signature: &CallSignature,
    ) -> FetchResult<Result<Value, ProviderError>> {
        let debug_calls = self.config.debug_calls;
        let client = self
            .clients
            .client(signature.profile(), signature.region(), signature.service())
            .map_err(|source| FetchError::Connect {
                profile: signature.profile().map(String::from),
                region: signature.region().map(String::from),
                service: signature.service().to_string(),
                source,
            })?;

        let paginate = client.supports_pagination(signature.method());
        if debug_calls {
            debug!(%signature, args = ?signature.args(), kwargs = ?signature.kwargs(), paginate, "provider call");
        }

        Ok(if paginate {
            client.paginate(signature.method(), signature.args(), signature.kwargs())
        } else {
            client.call(signature.method(), signature.args(), signature.kwargs())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ProviderClient;
    use serde_json::json;

    struct Static;

    struct StaticClient {
        region: Option<String>,
    }

    impl ProviderClient for StaticClient {
        fn call(&self, method: &str, _: &[String], _: &Kwargs) -> Result<Value, ProviderError> {
            Ok(Value::from(json!({"method": method, "region": self.region})))
        }
    }

    impl ClientFactory for Static {
        fn connect(
            &self,
            _profile: Option<&str>,
            region: Option<&str>,
            _service: &str,
        ) -> Result<Box<dyn ProviderClient>, ProviderError> {
            Ok(Box::new(StaticClient {
                region: region.map(String::from),
            }))
        }

        fn available_regions(&self, _service: &str) -> Result<Vec<String>, ProviderError> {
            Ok(vec!["eu-west-1".to_string(), "us-west-2".to_string()])
        }
    }

    fn engine() -> FetchEngine<Static> {
        FetchEngine::new(
            ClientRegistry::new(Static),
            ResponseCache::in_memory(),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_default_profile_and_discovered_regions() {
        let mut engine = engine();
        let out = engine
            .fetch(&FetchRequest::new("ec2", "describe_vpcs"), None)
            .unwrap();
        let regions: Vec<_> = out.iter().map(|(_, s)| s.region().unwrap()).collect();
        assert_eq!(regions, vec!["eu-west-1", "us-west-2"]);
        assert!(out.iter().all(|(_, s)| s.profile().is_none()));
    }

    #[test]
    fn test_regionless_service_ignores_requested_regions() {
        let mut engine = engine();
        let req = FetchRequest::new("iam", "list_users").regions(["eu-west-1", "ap-south-1"]);
        let out = engine.fetch(&req, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1.region(), Some("us-east-1"));
    }

    #[test]
    fn test_meta_attached_but_not_cached() {
        let mut engine = engine();
        let req = FetchRequest::new("ec2", "describe_vpcs").regions(["eu-west-1"]);
        let out = engine.fetch(&req, None).unwrap();
        let (response, signature) = &out[0];
        assert_eq!(
            response.meta(),
            Some(ResourceMeta::new(None, Some("eu-west-1")))
        );

        let cached = engine.cache_mut().get(&signature.cache_key()).unwrap();
        assert!(cached.meta().is_none());
    }
}
