//! The status-coded result every command produces.
//!
//! A [`RestObject`] carries a status code (as a string, e.g. `"200"`), an
//! ordered list of named fields and an optional error description. It
//! serializes to a flat JSON object:
//!
//! ```json
//! { "status": "200", "group": "admin", "id": "7" }
//! { "status": "400", "error": "The specified user account does not exist." }
//! ```
//!
//! Handlers that build a loose key/value mapping instead can convert it with
//! [`RestObject::from_pairs`]; the conventional `status` and `error` keys are
//! lifted out of the field list.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Status string for a successful command.
pub const STATUS_OK: &str = "200";

/// A command result.
#[derive(Debug, Clone, PartialEq)]
pub struct RestObject {
    status: String,
    fields: Vec<(String, Value)>,
    error: Option<String>,
}

impl RestObject {
    /// Creates an object with the given status and no fields.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            fields: Vec::new(),
            error: None,
        }
    }

    /// Creates a `"200"` object.
    pub fn ok() -> Self {
        Self::new(STATUS_OK)
    }

    /// Creates an error object with the given status and description.
    pub fn error(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            fields: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Creates a `"400"` error object.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error("400", message)
    }

    /// Builds an object from a loose key/value mapping.
    ///
    /// `status` and `error` keys populate the matching parts of the object;
    /// everything else becomes a field, in iteration order. A mapping without
    /// a `status` key is treated as a success.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut object = Self::ok();
        for (key, value) in pairs {
            object.set(key, value);
        }
        object
    }

    /// Assigns a named field.
    ///
    /// Re-assigning an existing name replaces the value in place, so the
    /// field keeps its original position. The names `status` and `error`
    /// update the status and error description instead.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        match key.as_str() {
            "status" => self.status = value_to_string(value),
            "error" => self.error = Some(value_to_string(value)),
            _ => match self.fields.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => self.fields.push((key, value)),
            },
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets the error description.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Looks up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The status string.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The status as a number, if it parses as one.
    pub fn status_code(&self) -> Option<u16> {
        self.status.parse().ok()
    }

    /// Whether the status is `"200"`.
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The error description.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields, excluding status and error.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Default for RestObject {
    fn default() -> Self {
        Self::ok()
    }
}

impl std::ops::Index<&str> for RestObject {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&Value::Null)
    }
}

impl Serialize for RestObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.fields.len() + usize::from(self.error.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("status", &self.status)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        map.end()
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
