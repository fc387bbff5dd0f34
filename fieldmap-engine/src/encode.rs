//! Instance -> keyed data.

use crate::mapped::{FieldValue, Mapped};
use crate::mapper::Mapper;
use fieldmap_model::{EffectiveFieldConfig, ResolvedClass};
use fieldmap_types::{KeyedData, MapError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Encodes `instance` using an already resolved configuration.
///
/// Fields are visited in declaration order and written into a scratch map
/// that is returned only when every field succeeded. Two fields resolving
/// to the same encode key are a [`MapError::Configuration`].
pub fn encode_with<T: Mapped>(
    instance: &T,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<KeyedData> {
    let mut out = KeyedData::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for config in class.encoded() {
        if let Some(previous) = owners.insert(&config.encode_key, &config.field) {
            return Err(MapError::configuration(
                class.name(),
                format!(
                    "fields '{previous}' and '{}' both encode to key '{}'",
                    config.field, config.encode_key
                ),
            ));
        }

        let value = instance.read_field(&config.field)?;
        let encoded = encode_field(value, config, class, mapper)?;
        out.insert(config.encode_key.clone(), encoded);
    }

    Ok(out)
}

fn encode_field(
    value: FieldValue<'_>,
    config: &EffectiveFieldConfig,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<Value> {
    match value {
        FieldValue::Value(Value::Null) => {
            if config.nullable {
                Ok(Value::Null)
            } else {
                Err(MapError::Nullability {
                    class: class.name().to_string(),
                    field: config.field.clone(),
                })
            }
        }
        FieldValue::Value(v) => match &config.processor {
            Some(processor) => processor.encode(v).map_err(|e| MapError::TypeMismatch {
                class: class.name().to_string(),
                field: config.field.clone(),
                expected: config.field_type.to_string(),
                detail: e.to_string(),
            }),
            None => Ok(v),
        },
        FieldValue::Object(object) => {
            if config.processor.is_some() {
                return Err(MapError::configuration(
                    class.name(),
                    format!(
                        "field '{}' has a processor but exposes a nested object",
                        config.field
                    ),
                ));
            }
            let type_name = config.field_type.object_type().ok_or_else(|| {
                MapError::configuration(
                    class.name(),
                    format!(
                        "field '{}' exposes a nested object but is declared as {}",
                        config.field, config.field_type
                    ),
                )
            })?;
            let serializer = mapper.registry().lookup(class, type_name)?;
            serializer.encode_object(object, mapper)
        }
    }
}
