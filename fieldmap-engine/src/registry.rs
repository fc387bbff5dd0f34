//! Serializers for nested object fields.

use crate::mapped::Mapped;
use crate::mapper::Mapper;
use fieldmap_model::ResolvedClass;
use fieldmap_types::{MapError, Result, kind_of};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// Encodes and decodes nested objects of the types it handles.
pub trait NestedSerializer: Send + Sync {
    fn handles(&self, type_name: &str) -> bool;

    fn encode_object(&self, object: &dyn Any, mapper: &Mapper) -> Result<Value>;

    fn decode_object(&self, data: &Value, mapper: &Mapper) -> Result<Box<dyn Any + Send>>;
}

/// Nested serializer for any [`Mapped`] type, recursing into the engine.
pub struct MappedSerializer<T> {
    type_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Mapped> MappedSerializer<T> {
    pub fn new() -> Self {
        Self {
            type_name: T::descriptor().name,
            _marker: PhantomData,
        }
    }
}

impl<T: Mapped> Default for MappedSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Mapped> NestedSerializer for MappedSerializer<T> {
    fn handles(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }

    fn encode_object(&self, object: &dyn Any, mapper: &Mapper) -> Result<Value> {
        let instance = object.downcast_ref::<T>().ok_or_else(|| {
            MapError::configuration(
                &self.type_name,
                format!("nested value is not a {}", std::any::type_name::<T>()),
            )
        })?;
        mapper.encode(instance).map(Value::Object)
    }

    fn decode_object(&self, data: &Value, mapper: &Mapper) -> Result<Box<dyn Any + Send>> {
        let Value::Object(map) = data else {
            return Err(MapError::Serialization(format!(
                "expected a map for '{}', found {}",
                self.type_name,
                kind_of(data)
            )));
        };
        let instance: T = mapper.decode(map)?;
        Ok(Box::new(instance))
    }
}

/// Nested serializers by id.
///
/// A class lists the ids it may use in
/// [`ClassDescriptor::nested_serializers`](fieldmap_model::ClassDescriptor);
/// [`lookup`](Self::lookup) walks that list in order.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn NestedSerializer>>,
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `serializer` under `id`, replacing any previous entry.
    pub fn register<S: NestedSerializer + 'static>(
        &mut self,
        id: impl Into<String>,
        serializer: S,
    ) -> &mut Self {
        self.serializers.insert(id.into(), Arc::new(serializer));
        self
    }

    /// Registers a [`MappedSerializer`] for `T` under `id`.
    pub fn register_mapped<T: Mapped>(&mut self, id: impl Into<String>) -> &mut Self {
        self.register(id, MappedSerializer::<T>::new())
    }

    pub fn get(&self, id: &str) -> Option<&dyn NestedSerializer> {
        self.serializers.get(id).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Finds the serializer for a nested object of `type_name` inside
    /// `class`. The first listed serializer that handles the type wins.
    pub fn lookup(&self, class: &ResolvedClass, type_name: &str) -> Result<&dyn NestedSerializer> {
        for id in class.nested_serializers() {
            let serializer = self.get(id).ok_or_else(|| {
                MapError::configuration(
                    class.name(),
                    format!("nested serializer '{id}' is not registered"),
                )
            })?;
            if serializer.handles(type_name) {
                trace!(class = %class.name(), serializer = %id, nested = %type_name, "Nested serializer selected");
                return Ok(serializer);
            }
        }
        Err(MapError::configuration(
            class.name(),
            format!("no nested serializer handles type '{type_name}'"),
        ))
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("SerializerRegistry").field("ids", &ids).finish()
    }
}
