//! Provider response values.
//!
//! Provider SDKs hand back loosely typed payloads: an object, an array or a
//! primitive, discriminated only at use time. [`Value`] makes that explicit
//! and adds a `DateTime` variant so timestamps survive a trip through the
//! response cache (see [`crate::codec`]).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Reserved object field carrying the originating profile and region.
pub const META_KEY: &str = "__meta";

/// Ordered object map.
pub type Map = BTreeMap<String, Value>;

/// JSON-like value with a first-class timestamp variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    DateTime(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Empty object.
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Field lookup; `None` for non-objects and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// The `__meta` annotation, if this is an object carrying one.
    pub fn meta(&self) -> Option<ResourceMeta> {
        self.get(META_KEY).map(ResourceMeta::from_value)
    }

    /// Attach `meta` under `__meta`. No-op for non-objects.
    pub fn set_meta(&mut self, meta: &ResourceMeta) {
        if let Some(map) = self.as_object_mut() {
            map.insert(META_KEY.to_string(), meta.to_value());
        }
    }

    /// Lossless conversion to `serde_json::Value`; timestamps become RFC 3339 strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::Value::String(format_datetime(dt)),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// RFC 3339 rendering used for cache documents and cache keys.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

/// Plain conversion; strings stay strings. Use [`crate::codec::decode`] to
/// recover timestamps from cached documents.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

/// Origin of a resource: which credentials and region produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResourceMeta {
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl ResourceMeta {
    pub fn new(profile: Option<&str>, region: Option<&str>) -> Self {
        Self {
            profile: profile.map(String::from),
            region: region.map(String::from),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("profile".to_string(), opt_string(&self.profile));
        map.insert("region".to_string(), opt_string(&self.region));
        Value::Object(map)
    }

    /// Best-effort read back from a `__meta` value; unknown shapes yield empty meta.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(String::from);
        Self {
            profile: field("profile"),
            region: field("region"),
        }
    }
}

fn opt_string(s: &Option<String>) -> Value {
    s.as_deref().map(Value::from).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_shape() {
        let v = Value::from(json!({"a": [1, "x", null], "b": {"c": true}}));
        assert_eq!(v.get("a").and_then(Value::as_array).map(Vec::len), Some(3));
        assert_eq!(v.get("b").and_then(|b| b.get("c")), Some(&Value::Bool(true)));
        assert_eq!(v.kind(), "object");
    }

    #[test]
    fn test_meta_set_and_read() {
        let mut v = Value::object();
        let meta = ResourceMeta::new(Some("prod"), Some("eu-west-1"));
        v.set_meta(&meta);
        assert_eq!(v.meta(), Some(meta));

        let mut s = Value::from("raw");
        s.set_meta(&ResourceMeta::default());
        assert_eq!(s, Value::from("raw"));
    }

    #[test]
    fn test_meta_with_default_profile_is_null() {
        let meta = ResourceMeta::new(None, Some("us-east-1"));
        assert_eq!(
            meta.to_value().to_json(),
            json!({"profile": null, "region": "us-east-1"})
        );
    }

    #[test]
    fn test_datetime_serializes_as_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let v = Value::from(dt);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2024-03-01T12:30:00Z\"");
    }
}
