//! Named-field access to records.
//!
//! The engine never looks inside a record except through [`Record::field`],
//! so any shape works: decoded JSON objects, string maps from table rows, or
//! hand-written structs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A record the view engine can filter and sort.
///
/// # Manual Implementation
///
/// ```
/// use viewdeck_seeker::{Record, Value, Number};
///
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "title" => Value::String(&self.title),
///             "priority" => Value::Number(Number::U64(self.priority as u64)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] when absent.
    fn field(&self, name: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map(Value::from_json).unwrap_or(Value::None)
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map(Value::from_json).unwrap_or(Value::None)
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name)
            .map(|s| Value::String(s))
            .unwrap_or(Value::None)
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name)
            .map(|s| Value::String(s))
            .unwrap_or(Value::None)
    }
}

/// A record decoded from a JSON object.
///
/// Serializes transparently as the underlying object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRecord(pub serde_json::Map<String, serde_json::Value>);

impl JsonRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        JsonRecord::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the raw JSON value of a field.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    /// Iterates over field names in key order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Record for JsonRecord {
    fn field(&self, name: &str) -> Value<'_> {
        self.0.field(name)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for JsonRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        JsonRecord(map)
    }
}

impl TryFrom<serde_json::Value> for JsonRecord {
    type Error = serde_json::Value;

    /// Accepts objects; hands back anything else unchanged.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(JsonRecord(map)),
            other => Err(other),
        }
    }
}
