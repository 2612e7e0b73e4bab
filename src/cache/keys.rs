//! Key Fingerprinting
//!
//! Turns request identifiers and structured query descriptors into cache keys.
//!
//! Query keys serialize as `<name>.<canonical JSON of params>` so that a
//! `<name>.*` invalidation pattern selects every variant of the query.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

// == Cache Key ==
/// Canonical string identifying one cacheable computation's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Uses an already-canonical identifier (e.g. a request path with ordered
/// query parameters) as the key.
pub fn make_key(identifier: impl Into<String>) -> CacheKey {
    CacheKey(identifier.into())
}

/// Prefixes `identifier` with a view name: `<name>.<identifier>`.
pub fn scoped_key(name: &str, identifier: &str) -> CacheKey {
    CacheKey(format!("{name}.{identifier}"))
}

// == Query Key ==
/// A named query followed by (possibly nested) parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryKey {
    pub name: String,
    pub params: Vec<Value>,
}

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends one parameter value; anything serializable is accepted.
    pub fn param<T: Serialize>(mut self, param: T) -> Self {
        // Serializing plain data into a Value cannot fail; maps with
        // non-string keys are the exception and become null.
        self.params
            .push(serde_json::to_value(param).unwrap_or(Value::Null));
        self
    }

    pub fn to_key(&self) -> CacheKey {
        CacheKey(query_key_to_string(self))
    }
}

impl From<&QueryKey> for CacheKey {
    fn from(query: &QueryKey) -> Self {
        query.to_key()
    }
}

/// Serializes a query key into one string.
///
/// Object keys are sorted at every nesting depth, so two semantically equal
/// parameter maps produce identical output whatever their insertion order.
pub fn query_key_to_string(query: &QueryKey) -> String {
    let params = Value::Array(query.params.iter().map(canonicalize).collect());
    format!("{}.{}", query.name, params)
}

// serde_json's `Map` iterates in key order unless its `preserve_order` feature
// is switched on anywhere in the build, in which case it keeps insertion order.
// Sorting here keeps the fingerprint the same under both.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
