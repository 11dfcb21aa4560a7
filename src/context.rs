//! Shared execution context for dependent steps.
//!
//! Values extracted by one step's relations are written here and read by
//! later steps (variable substitution in later specs is the loader's
//! business, not this crate's). The context outlives any single step.

use std::collections::HashMap;

use serde_json::Value;

/// A value extracted from a request/response exchange.
///
/// Most extractions produce JSON values (an extracted field, a header
/// string, the flattened cookie string); the `$` expression produces the
/// raw response body bytes, which have no lossless JSON form.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// A structured or scalar JSON value.
    Json(Value),
    /// Raw response body bytes, exactly as received.
    Bytes(Vec<u8>),
}

impl ContextValue {
    /// Returns the JSON value, if this is the JSON arm.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ContextValue::Json(value) => Some(value),
            ContextValue::Bytes(_) => None,
        }
    }

    /// Returns the raw bytes, if this is the bytes arm.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ContextValue::Json(_) => None,
            ContextValue::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        ContextValue::Json(value)
    }
}

impl From<Vec<u8>> for ContextValue {
    fn from(bytes: Vec<u8>) -> Self {
        ContextValue::Bytes(bytes)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Json(Value::String(s.to_string()))
    }
}

/// Run-scoped key/value store populated by dependency extraction.
///
/// The context is passed `&mut` into each step and never owned by it.
/// Writes overwrite any prior value for the same key. This type performs no
/// locking: a caller running steps concurrently must either give each
/// logical run its own context or serialize access externally.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    values: HashMap<String, ContextValue>,
}

impl ExecutionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a previously extracted value.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Stores an extracted value, overwriting any prior value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Whether a key has been written.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
