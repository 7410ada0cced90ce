//! The patient record sent to the completion service.
//!
//! DIARISK deliberately does not impose a schema on its input. Whatever
//! clinical attributes the caller supplies are forwarded to the model
//! verbatim, including nulls and out-of-range values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DiariskError, DiariskResult};

/// An open-ended mapping of clinical attributes.
///
/// Typical keys: `age`, `bmi`, `glucose_level`, `family_history`, `symptoms`,
/// `blood_pressure`, `cholesterol`, `physical_activity`. Keys render in
/// the order they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord(Map<String, Value>);

impl PatientRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// Returns `DiariskError::InvalidPatientRecord` when `value` is not a
    /// JSON object. Attribute values themselves are not inspected.
    pub fn from_value(value: Value) -> DiariskResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DiariskError::InvalidPatientRecord {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`PatientRecord::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove `key`, returning its previous value. Remaining keys keep
    /// their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the record as 2-space indented JSON for embedding in a prompt.
    pub fn to_pretty_json(&self) -> String {
        // A map of `Value`s always serializes; the fallback is unreachable.
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Short human-readable name of a JSON value's kind, used in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
