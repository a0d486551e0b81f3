//! Typed property values carried by nodes and relationships.
//!
//! Values keep their JSON type (text, integer, float, boolean) all the way to
//! the store; nothing is coerced to text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered property map (stable ordering keeps rendered statements deterministic).
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Boolean(b) => write!(f, "{b}"),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Convert a JSON scalar into a property value.
///
/// Returns `Ok(None)` for `null` (absent attribute) and an error message for
/// arrays and objects, which have no property representation here.
pub fn from_json(value: &serde_json::Value) -> Result<Option<PropertyValue>, String> {
    use serde_json::Value;
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(PropertyValue::Boolean(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Some(PropertyValue::Integer(i))),
            None => n
                .as_f64()
                .map(|f| Some(PropertyValue::Float(f)))
                .ok_or_else(|| format!("number {n} is out of range")),
        },
        Value::String(s) => Ok(Some(PropertyValue::Text(s.clone()))),
        Value::Array(_) => Err("arrays are not supported as property values".to_string()),
        Value::Object(_) => Err("objects are not supported as property values".to_string()),
    }
}

/// Flatten a serializable record into a property map, dropping `null` fields.
pub fn to_property_map<T: Serialize>(record: &T) -> crate::Result<PropertyMap> {
    let value = serde_json::to_value(record)?;
    let object = match value {
        serde_json::Value::Object(object) => object,
        other => {
            return Err(crate::ChainGraphError::Validation(format!(
                "expected a record object, got {other}"
            )))
        }
    };

    let mut props = PropertyMap::new();
    for (key, value) in &object {
        let converted = from_json(value)
            .map_err(|e| crate::ChainGraphError::Validation(format!("{key}: {e}")))?;
        if let Some(v) = converted {
            props.insert(key.clone(), v);
        }
    }
    Ok(props)
}
