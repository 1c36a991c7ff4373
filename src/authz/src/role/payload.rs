//! Role payloads (attribute bags)

use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute bag carried by a role value
///
/// Fields are kept in name order so that equality is structural and the
/// rendered form is stable. A kind without meaningful attributes carries the
/// canonical [`Payload::unit`], which makes all of its instances equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    fields: BTreeMap<String, Value>,
}

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical payload of attribute-less kinds
    pub fn unit() -> Self {
        Self::default()
    }

    /// Add a field to the payload
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Build a payload from any serializable record
    ///
    /// Structs become one field per member. Unit values (`()`, unit structs)
    /// become [`Payload::unit`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::InvalidInput`] if the record does not serialize
    /// to an object or to null.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self> {
        let value = serde_json::to_value(record)
            .map_err(|e| AuthzError::InvalidInput(format!("Unserializable record: {}", e)))?;

        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            Value::Null => Ok(Self::unit()),
            other => Err(AuthzError::InvalidInput(format!(
                "Record must serialize to an object or unit, got {}",
                other
            ))),
        }
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the payload carries the named field
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether this is the unit payload
    pub fn is_unit(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compare `self[field]` with `other[other_field]`
    ///
    /// A missing field on either side never matches.
    pub fn field_matches(&self, field: &str, other: &Payload, other_field: &str) -> bool {
        match (self.get(field), other.get(other_field)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (position, (field, value)) in self.fields.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field, value)?;
        }
        write!(f, ")")
    }
}
