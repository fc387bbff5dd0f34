//! Keyed data -> decoded field values.

use crate::mapped::{DecodedFields, Slot};
use crate::mapper::Mapper;
use fieldmap_model::{EffectiveFieldConfig, ResolvedClass};
use fieldmap_types::{KeyedData, MapError, Result, kind_of};
use serde_json::Value;

/// Decodes the values of every decoded field of `class` from `data`.
///
/// A key that is absent or holds null falls back, in order, to the
/// constructor default, the field's default value, and null for nullable
/// fields; otherwise decoding fails with [`MapError::MissingField`]. A
/// processor that decodes a value to null takes the same fallbacks.
/// Object construction is left to [`Mapped::construct`](crate::Mapped::construct).
pub fn decode_values(
    data: &KeyedData,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<DecodedFields> {
    let mut fields = DecodedFields::new(class.name());

    for config in class.decoded() {
        let slot = match data.get(&config.decode_key) {
            Some(raw) if !raw.is_null() => decode_present(raw, config, class, mapper)?,
            _ => decode_absent(config, class, mapper)?,
        };
        fields.insert(config.field.as_str(), config.decode_key.as_str(), slot);
    }

    Ok(fields)
}

fn decode_present(
    raw: &Value,
    config: &EffectiveFieldConfig,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<Slot> {
    let Some(processor) = &config.processor else {
        return decode_native(raw, config, class, mapper);
    };

    if config.field_type.object_type().is_some() {
        return Err(MapError::configuration(
            class.name(),
            format!(
                "field '{}' has a processor but is declared as {}",
                config.field, config.field_type
            ),
        ));
    }

    let value = processor
        .decode(raw.clone())
        .map_err(|e| mismatch(config, class, e.to_string()))?;
    // A processor yielding null is treated like an absent value.
    if value.is_null() {
        return decode_absent(config, class, mapper);
    }
    if !config.field_type.accepts(&value) {
        return Err(mismatch(
            config,
            class,
            format!("processor produced {}", kind_of(&value)),
        ));
    }
    Ok(Slot::Value(value))
}

/// A value already in the field's native shape: raw keyed data without a
/// processor, or a default value.
fn decode_native(
    value: &Value,
    config: &EffectiveFieldConfig,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<Slot> {
    if !config.field_type.accepts(value) {
        return Err(mismatch(
            config,
            class,
            format!("found {}", kind_of(value)),
        ));
    }

    match config.field_type.object_type() {
        Some(type_name) if !value.is_null() => {
            let serializer = mapper.registry().lookup(class, type_name)?;
            serializer.decode_object(value, mapper).map(Slot::Object)
        }
        _ if value.is_null() => Ok(Slot::Null),
        _ => Ok(Slot::Value(value.clone())),
    }
}

fn decode_absent(
    config: &EffectiveFieldConfig,
    class: &ResolvedClass,
    mapper: &Mapper,
) -> Result<Slot> {
    if config.value_from_constructor {
        return Ok(Slot::Deferred);
    }
    if let Some(default) = &config.default_value {
        return decode_native(default, config, class, mapper);
    }
    if config.nullable {
        return Ok(Slot::Null);
    }
    Err(MapError::MissingField {
        class: class.name().to_string(),
        field: config.field.clone(),
        key: config.decode_key.clone(),
    })
}

fn mismatch(config: &EffectiveFieldConfig, class: &ResolvedClass, detail: String) -> MapError {
    MapError::TypeMismatch {
        class: class.name().to_string(),
        field: config.field.clone(),
        expected: config.field_type.to_string(),
        detail,
    }
}
