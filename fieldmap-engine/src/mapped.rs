//! The contract between the engine and a concrete type.
//!
//! The engine never discovers fields itself. A type (usually through
//! generated glue) lists its fields, reads them on demand, and builds itself
//! from the values the engine decoded.

use fieldmap_model::ClassDescriptor;
use fieldmap_types::{FieldInfo, MapError, Result, kind_of};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A type the engine can encode and decode.
pub trait Mapped: Sized + Send + Sync + 'static {
    /// The class-level descriptor, including per-field overrides.
    fn descriptor() -> ClassDescriptor;

    /// All fields in declaration order.
    fn fields() -> Vec<FieldInfo>;

    /// Reads the current value of `field`.
    fn read_field(&self, field: &str) -> Result<FieldValue<'_>>;

    /// Builds an instance from decoded field values.
    fn construct(fields: DecodedFields) -> Result<Self>;
}

/// The value of a field as read from a live instance.
pub enum FieldValue<'a> {
    /// A plain value; `Value::Null` is the logical null.
    Value(Value),
    /// A nested object, encoded through a nested serializer.
    Object(&'a (dyn Any + Send + Sync)),
}

impl<'a> FieldValue<'a> {
    /// Serializes `value`; `None` for an `Option` field becomes the logical null.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Value(serde_json::to_value(value)?))
    }

    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn object<T: Any + Send + Sync>(value: &'a T) -> Self {
        Self::Object(value)
    }

    /// A nested object that may be absent.
    pub fn optional_object<T: Any + Send + Sync>(value: Option<&'a T>) -> Self {
        match value {
            Some(object) => Self::Object(object),
            None => Self::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// What decode produced for one field.
pub enum Slot {
    Value(Value),
    /// Absent or null, and the field is nullable.
    Null,
    /// A nested object built by a nested serializer.
    Object(Box<dyn Any + Send>),
    /// Absent; the constructor supplies its own default.
    Deferred,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Null => f.write_str("Null"),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Deferred => f.write_str("Deferred"),
        }
    }
}

#[derive(Debug)]
struct Entry {
    key: String,
    slot: Slot,
}

/// Decoded values of one class, handed to [`Mapped::construct`].
///
/// Accessors take the value out of the set, so each field is read once.
/// Fields that were never decoded (ignored or skipped) report a
/// [`MapError::Construction`] unless read through a defaulting accessor.
#[derive(Debug)]
pub struct DecodedFields {
    class: String,
    entries: HashMap<String, Entry>,
}

impl DecodedFields {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: HashMap::new(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Records the slot decoded for `field` from `key`.
    pub fn insert(&mut self, field: impl Into<String>, key: impl Into<String>, slot: Slot) {
        self.entries.insert(
            field.into(),
            Entry {
                key: key.into(),
                slot,
            },
        );
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn slot(&self, field: &str) -> Option<&Slot> {
        self.entries.get(field).map(|e| &e.slot)
    }

    /// True when the constructor must supply the field's default itself.
    pub fn is_deferred(&self, field: &str) -> bool {
        matches!(self.slot(field), Some(Slot::Deferred))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the raw slot for `field`.
    pub fn take(&mut self, field: &str) -> Option<Slot> {
        self.entries.remove(field).map(|e| e.slot)
    }

    /// Takes a required plain value. A null slot is handed to `T` as JSON
    /// null, so `Option<T>` targets accept it.
    pub fn value<T: DeserializeOwned>(&mut self, field: &str) -> Result<T> {
        let Some(entry) = self.entries.remove(field) else {
            return Err(self.not_decoded(field));
        };
        match entry.slot {
            Slot::Value(v) => self.convert(field, v),
            Slot::Null => self.convert(field, Value::Null),
            Slot::Deferred => Err(MapError::MissingField {
                class: self.class.clone(),
                field: field.to_string(),
                key: entry.key,
            }),
            Slot::Object(_) => Err(self.mismatch(field, "plain value", "found nested object")),
        }
    }

    /// Takes an optional plain value; null, deferred and undecoded fields
    /// yield `None`.
    pub fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Result<Option<T>> {
        match self.take(field) {
            Some(Slot::Value(v)) => self.convert(field, v).map(Some),
            Some(Slot::Object(_)) => Err(self.mismatch(field, "plain value", "found nested object")),
            Some(Slot::Null | Slot::Deferred) | None => Ok(None),
        }
    }

    /// Takes a plain value, falling back to `T::default()` when the field is
    /// null, deferred, or was not decoded.
    pub fn or_default<T: DeserializeOwned + Default>(&mut self, field: &str) -> Result<T> {
        Ok(self.optional(field)?.unwrap_or_default())
    }

    /// Takes a required nested object.
    pub fn object<T: Any>(&mut self, field: &str) -> Result<T> {
        let Some(key) = self.entries.get(field).map(|e| e.key.clone()) else {
            return Err(self.not_decoded(field));
        };
        match self.optional_object(field)? {
            Some(object) => Ok(object),
            None => Err(MapError::MissingField {
                class: self.class.clone(),
                field: field.to_string(),
                key,
            }),
        }
    }

    /// Takes an optional nested object.
    pub fn optional_object<T: Any>(&mut self, field: &str) -> Result<Option<T>> {
        match self.take(field) {
            Some(Slot::Object(boxed)) => match boxed.downcast::<T>() {
                Ok(object) => Ok(Some(*object)),
                Err(_) => Err(self.mismatch(
                    field,
                    std::any::type_name::<T>(),
                    "found a different nested type",
                )),
            },
            Some(Slot::Value(v)) => {
                let detail = format!("found {}", kind_of(&v));
                Err(self.mismatch(field, "nested object", &detail))
            }
            Some(Slot::Null | Slot::Deferred) | None => Ok(None),
        }
    }

    fn convert<T: DeserializeOwned>(&self, field: &str, value: Value) -> Result<T> {
        let found = kind_of(&value);
        serde_json::from_value(value).map_err(|e| {
            self.mismatch(
                field,
                std::any::type_name::<T>(),
                &format!("found {found}: {e}"),
            )
        })
    }

    fn mismatch(&self, field: &str, expected: &str, detail: &str) -> MapError {
        MapError::TypeMismatch {
            class: self.class.clone(),
            field: field.to_string(),
            expected: expected.to_string(),
            detail: detail.to_string(),
        }
    }

    fn not_decoded(&self, field: &str) -> MapError {
        MapError::Construction {
            class: self.class.clone(),
            detail: format!("field '{field}' was not decoded"),
        }
    }
}
