//! Declared field shapes and the keyed-data representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The generic, string-keyed representation produced by encode and consumed
/// by decode. Insertion order follows the class's field order.
pub type KeyedData = serde_json::Map<String, Value>;

/// The declared type of a field, as reported by the introspection layer.
///
/// Used to type-check decoded values. `Value::Null` is accepted by every
/// type; whether a null is allowed is decided by nullability, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Any JSON value.
    Any,
    Bool,
    /// A JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Float,
    String,
    List,
    Map,
    /// A nested mapped object, identified by its class name.
    Object(String),
}

impl FieldType {
    /// Shorthand for a nested object field.
    pub fn object(type_name: impl Into<String>) -> Self {
        Self::Object(type_name.into())
    }

    /// Returns true if `value` is an acceptable raw value for this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (Self::Any, _) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, Value::Number(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::List, Value::Array(_)) => true,
            (Self::Map | Self::Object(_), Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Returns the nested class name for object fields.
    #[must_use]
    pub fn object_type(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::List => f.write_str("list"),
            Self::Map => f.write_str("map"),
            Self::Object(name) => write!(f, "object '{name}'"),
        }
    }
}

/// Names a JSON value's kind, for error messages.
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// One field of a class, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldInfo {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn any(name: &str) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn list(name: &str) -> Self {
        Self::new(name, FieldType::List)
    }

    pub fn map(name: &str) -> Self {
        Self::new(name, FieldType::Map)
    }

    /// Shorthand for a nested object field of class `type_name`.
    pub fn object(name: &str, type_name: &str) -> Self {
        Self::new(name, FieldType::object(type_name))
    }
}
