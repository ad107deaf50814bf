//! Extraction algebra over fetched responses.
//!
//! A [`ResultSet`] is an ordered list of values. Every stage consumes the set
//! and returns a new one, so listings read as pipelines:
//!
//! ```
//! use cloudprobe_core::{ResultSet, Value};
//! use serde_json::json;
//!
//! let responses = vec![Value::from(json!({
//!     "Reservations": [{"Instances": [{"InstanceId": "i-1"}, {"InstanceId": "i-2"}]}]
//! }))];
//!
//! let instances = ResultSet::new(responses)
//!     .extract_key("Reservations")
//!     .flatten()?
//!     .extract_key("Instances")
//!     .flatten()?
//!     .values();
//! assert_eq!(instances.len(), 2);
//! # Ok::<(), cloudprobe_core::QueryError>(())
//! ```
//!
//! `__meta` set by the fetch engine follows extracted objects: an extracted
//! object inherits its parent's meta, and so does every object inside an
//! extracted array. Strings and other primitives inside arrays are left as
//! they are, which keeps raw identifier lists (e.g. inline policy names)
//! intact.

use crate::error::QueryError;
use crate::signature::CallSignature;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<Value>,
}

impl ResultSet {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    /// Wrap fetch output, dropping the signatures.
    pub fn from_responses(responses: Vec<(Value, CallSignature)>) -> Self {
        Self::new(responses.into_iter().map(|(value, _)| value).collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Replace each element with its `key` field, or `null` when absent.
    pub fn extract_key(self, key: &str) -> Self {
        self.extract_key_or(key, Value::Null)
    }

    /// Replace each element with its `key` field, or `default` when the
    /// element is not an object or lacks the key.
    pub fn extract_key_or(self, key: &str, default: Value) -> Self {
        let items = self
            .items
            .into_iter()
            .map(|item| extract_one(item, key, &default))
            .collect();
        Self { items }
    }

    /// Concatenate array elements into one flat set.
    ///
    /// Every element must be an array; anything else is a
    /// [`QueryError::NotASequence`].
    pub fn flatten(self) -> Result<Self, QueryError> {
        let mut items = Vec::new();
        for (index, item) in self.items.into_iter().enumerate() {
            match item {
                Value::Array(members) => items.extend(members),
                other => {
                    return Err(QueryError::NotASequence {
                        index,
                        kind: other.kind(),
                    })
                }
            }
        }
        Ok(Self { items })
    }

    /// Terminal stage.
    pub fn values(self) -> Vec<Value> {
        self.items
    }
}

impl IntoIterator for ResultSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl From<Vec<Value>> for ResultSet {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

fn extract_one(item: Value, key: &str, default: &Value) -> Value {
    let meta = item.meta();
    let mut extracted = match item {
        Value::Object(mut map) => map.remove(key).unwrap_or_else(|| default.clone()),
        _ => default.clone(),
    };

    let Some(meta) = meta else {
        return extracted;
    };
    match extracted {
        Value::Object(_) => extracted.set_meta(&meta),
        Value::Array(ref mut members) => {
            for member in members.iter_mut() {
                // Only objects carry meta; strings are raw identifiers.
                if member.is_object() {
                    member.set_meta(&meta);
                }
            }
        }
        _ => {}
    }
    extracted
}
