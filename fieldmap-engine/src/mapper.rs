use crate::cache::ConfigCache;
use crate::decode::decode_values;
use crate::encode::encode_with;
use crate::mapped::Mapped;
use crate::registry::SerializerRegistry;
use fieldmap_model::ResolvedClass;
use fieldmap_types::{KeyedData, MapError, Result, kind_of};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Encodes and decodes [`Mapped`] types.
///
/// Holds no per-call state: one `Mapper` can be shared across threads and
/// used for any number of types. Each type is resolved once, on first use.
#[derive(Debug, Default)]
pub struct Mapper {
    registry: SerializerRegistry,
    cache: ConfigCache,
}

impl Mapper {
    /// A mapper without nested serializers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: SerializerRegistry) -> Self {
        Self {
            registry,
            cache: ConfigCache::new(),
        }
    }

    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// The effective field configuration of `T`.
    pub fn resolved<T: Mapped>(&self) -> Result<Arc<ResolvedClass>> {
        self.cache.get_or_resolve::<T>()
    }

    pub fn encode<T: Mapped>(&self, instance: &T) -> Result<KeyedData> {
        let class = self.resolved::<T>()?;
        encode_with(instance, &class, self)
            .inspect_err(|e| debug!(class = %class.name(), error = %e, "Encode failed"))
    }

    pub fn decode<T: Mapped>(&self, data: &KeyedData) -> Result<T> {
        let class = self.resolved::<T>()?;
        decode_values(data, &class, self)
            .and_then(T::construct)
            .inspect_err(|e| debug!(class = %class.name(), error = %e, "Decode failed"))
    }

    /// Encodes into a JSON object value.
    pub fn encode_value<T: Mapped>(&self, instance: &T) -> Result<Value> {
        self.encode(instance).map(Value::Object)
    }

    /// Decodes from a JSON value, which must be an object.
    pub fn decode_value<T: Mapped>(&self, value: &Value) -> Result<T> {
        match value {
            Value::Object(map) => self.decode(map),
            other => Err(MapError::Serialization(format!(
                "expected a map, found {}",
                kind_of(other)
            ))),
        }
    }
}
