//! Field configuration resolution.
//!
//! Merges class defaults with per-field overrides, attribute by attribute,
//! into one [`EffectiveFieldConfig`] per participating field.

use crate::descriptor::{ClassDescriptor, FieldDescriptor};
use crate::processor::ProcessorRef;
use fieldmap_types::{FieldInfo, FieldType, MapError, Result};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Fully resolved behaviour of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveFieldConfig {
    pub field: String,
    pub field_type: FieldType,
    pub will_encode: bool,
    pub will_decode: bool,
    pub encode_key: String,
    pub decode_key: String,
    pub nullable: bool,
    pub processor: Option<ProcessorRef>,
    pub default_value: Option<Value>,
    pub value_from_constructor: bool,
}

impl EffectiveFieldConfig {
    /// A decoded field with no way to fill in a missing value.
    pub fn is_required(&self) -> bool {
        self.will_decode
            && !self.nullable
            && !self.value_from_constructor
            && self.default_value.is_none()
    }
}

/// The resolved configuration table of one class, in field order.
///
/// Pure data derived from immutable inputs; safe to share between threads
/// and to cache for the lifetime of the class descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClass {
    name: String,
    fields: Vec<EffectiveFieldConfig>,
    nested_serializers: Vec<String>,
}

impl ResolvedClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[EffectiveFieldConfig] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&EffectiveFieldConfig> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EffectiveFieldConfig> {
        self.fields.iter()
    }

    /// Fields that contribute a key when encoding.
    pub fn encoded(&self) -> impl Iterator<Item = &EffectiveFieldConfig> {
        self.fields.iter().filter(|f| f.will_encode)
    }

    /// Fields that are read when decoding.
    pub fn decoded(&self) -> impl Iterator<Item = &EffectiveFieldConfig> {
        self.fields.iter().filter(|f| f.will_decode)
    }

    /// Serializer ids consulted, in priority order, for nested objects.
    pub fn nested_serializers(&self) -> &[String] {
        &self.nested_serializers
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedClass {
    type Item = &'a EffectiveFieldConfig;
    type IntoIter = std::slice::Iter<'a, EffectiveFieldConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Resolves `class` against the ordered field list of the type it describes.
///
/// Per field, in order of increasing precedence: class defaults, explicit
/// attributes of the field's override, then its skip flags. Ignored fields
/// and fields skipped in both directions produce no entry.
///
/// Fails with [`MapError::Configuration`] when the field list repeats a name
/// or an override asks for both a default value and a constructor default.
pub fn resolve(class: &ClassDescriptor, fields: &[FieldInfo]) -> Result<ResolvedClass> {
    let mut seen = HashSet::with_capacity(fields.len());
    for info in fields {
        if !seen.insert(info.name.as_str()) {
            return Err(MapError::configuration(
                &class.name,
                format!("field '{}' is declared twice", info.name),
            ));
        }
    }

    for name in class.field_overrides.keys().chain(class.ignored_fields.iter()) {
        if !seen.contains(name.as_str()) {
            warn!(class = %class.name, field = %name, "Descriptor names an unknown field, ignoring");
        }
    }

    let mut resolved = Vec::with_capacity(fields.len());
    for info in fields {
        if class.is_ignored(&info.name) {
            trace!(class = %class.name, field = %info.name, "Field ignored");
            continue;
        }

        let overrides = class.field_overrides.get(&info.name);
        match resolve_field(class, info, overrides)? {
            Some(config) => {
                trace!(
                    class = %class.name,
                    field = %config.field,
                    encode_key = %config.encode_key,
                    decode_key = %config.decode_key,
                    will_encode = config.will_encode,
                    will_decode = config.will_decode,
                    nullable = config.nullable,
                    "Field resolved"
                );
                resolved.push(config);
            }
            None => trace!(class = %class.name, field = %info.name, "Field excluded in both directions"),
        }
    }

    debug!(
        class = %class.name,
        declared = fields.len(),
        resolved = resolved.len(),
        "Resolved field configuration"
    );

    Ok(ResolvedClass {
        name: class.name.clone(),
        fields: resolved,
        nested_serializers: class.nested_serializers.clone(),
    })
}

fn resolve_field(
    class: &ClassDescriptor,
    info: &FieldInfo,
    overrides: Option<&FieldDescriptor>,
) -> Result<Option<EffectiveFieldConfig>> {
    let derived = class.naming.apply(&info.name);
    let mut config = EffectiveFieldConfig {
        field: info.name.clone(),
        field_type: info.field_type.clone(),
        will_encode: class.include_by_default,
        will_decode: class.include_by_default,
        encode_key: derived.clone(),
        decode_key: derived,
        nullable: class.nullable_by_default,
        processor: None,
        default_value: None,
        value_from_constructor: false,
    };

    let Some(descriptor) = overrides else {
        return Ok(participates(&config).then_some(config));
    };

    if descriptor.has_ambiguous_default() {
        return Err(MapError::configuration(
            &class.name,
            format!(
                "field '{}' sets both a default value and a constructor default",
                info.name
            ),
        ));
    }

    // An override opts the field in even when the class excludes by default.
    config.will_encode = true;
    config.will_decode = true;

    if let Some(key) = &descriptor.encode_key {
        config.encode_key = key.clone();
    }
    if let Some(key) = &descriptor.decode_key {
        config.decode_key = key.clone();
    }
    if let Some(nullable) = descriptor.nullable {
        config.nullable = nullable;
    }
    config.processor = descriptor.processor.clone();
    config.default_value = descriptor.default_value.clone();
    config.value_from_constructor = descriptor.value_from_constructor;

    if descriptor.skip_encode {
        config.will_encode = false;
    }
    if descriptor.skip_decode {
        config.will_decode = false;
    }

    Ok(participates(&config).then_some(config))
}

fn participates(config: &EffectiveFieldConfig) -> bool {
    config.will_encode || config.will_decode
}
