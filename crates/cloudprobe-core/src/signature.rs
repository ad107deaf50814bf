//! Call signatures and cache keys.

use std::fmt;

use crate::value::{format_datetime, Value};

/// Namespace tag separating these keys from other users of the same store.
pub const CACHE_NAMESPACE: &str = "cloudprobe";

/// Keyword arguments in insertion order.
///
/// Order is significant: it is part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kwargs(Vec<(String, Value)>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Identity of one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignature {
    profile: Option<String>,
    region: Option<String>,
    service: String,
    method: String,
    args: Vec<String>,
    kwargs: Kwargs,
}

impl CallSignature {
    pub fn new(
        profile: Option<&str>,
        region: Option<&str>,
        service: impl Into<String>,
        method: impl Into<String>,
        args: Vec<String>,
        kwargs: Kwargs,
    ) -> Self {
        Self {
            profile: profile.map(String::from),
            region: region.map(String::from),
            service: service.into(),
            method: method.into(),
            args,
            kwargs,
        }
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// Deterministic cache key:
    /// `cloudprobe:<profile>:<region>:<service>:<method>:<a1,a2>:<k1=v1,k2=v2>`.
    ///
    /// Absent profile/region render empty; kwargs keep insertion order.
    pub fn cache_key(&self) -> String {
        let kwargs = self
            .kwargs
            .iter()
            .map(|(k, v)| format!("{}={}", k, key_fragment(v)))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}:{}:{}:{}:{}:{}:{}",
            CACHE_NAMESPACE,
            self.profile.as_deref().unwrap_or(""),
            self.region.as_deref().unwrap_or(""),
            self.service,
            self.method,
            self.args.join(","),
            kwargs
        )
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} profile={} region={}",
            self.service,
            self.method,
            self.profile.as_deref().unwrap_or("default"),
            self.region.as_deref().unwrap_or("-")
        )
    }
}

fn key_fragment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::DateTime(dt) => format_datetime(dt),
        other => other.to_string(),
    }
}
