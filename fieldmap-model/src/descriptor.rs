use crate::processor::{Processor, ProcessorRef};
use fieldmap_types::{FieldInfo, NamingConvention, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Class-level serialization policy.
///
/// Authored once (statically, by generated glue, or from a
/// [`DescriptorFile`](crate::DescriptorFile)) and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    /// Type name used in errors and logs.
    pub name: String,
    /// Encode and decode every non-ignored field unless a field override
    /// says otherwise. When false, only fields with an override take part.
    pub include_by_default: bool,
    pub field_overrides: HashMap<String, FieldDescriptor>,
    /// Fields excluded unconditionally, whatever their override says.
    pub ignored_fields: HashSet<String>,
    pub nullable_by_default: bool,
    pub naming: NamingConvention,
    /// Serializer ids consulted, in order, for nested object fields.
    pub nested_serializers: Vec<String>,
}

impl ClassDescriptor {
    /// Creates a descriptor with the default policy: every field included,
    /// not nullable, keys equal to field names.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_by_default: true,
            field_overrides: HashMap::new(),
            ignored_fields: HashSet::new(),
            nullable_by_default: false,
            naming: NamingConvention::None,
            nested_serializers: Vec::new(),
        }
    }

    #[must_use]
    pub fn include_by_default(mut self, include: bool) -> Self {
        self.include_by_default = include;
        self
    }

    #[must_use]
    pub fn nullable_by_default(mut self, nullable: bool) -> Self {
        self.nullable_by_default = nullable;
        self
    }

    #[must_use]
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Adds (or replaces) the override for `field`.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.field_overrides.insert(field.into(), descriptor);
        self
    }

    #[must_use]
    pub fn ignore(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.insert(field.into());
        self
    }

    /// Appends a nested serializer id; earlier ids take priority.
    #[must_use]
    pub fn nested_serializer(mut self, id: impl Into<String>) -> Self {
        self.nested_serializers.push(id.into());
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.contains(field)
    }

    /// Resolves this descriptor against a class's field list.
    pub fn resolve(&self, fields: &[FieldInfo]) -> Result<crate::ResolvedClass> {
        crate::resolve(self, fields)
    }
}

/// Per-field override record. Every attribute is independent; unset
/// attributes fall back to the class defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptor {
    /// Key written when encoding. Derived from the naming convention if unset.
    pub encode_key: Option<String>,
    /// Key read when decoding. Derived from the naming convention if unset.
    pub decode_key: Option<String>,
    pub nullable: Option<bool>,
    pub processor: Option<ProcessorRef>,
    /// Substituted when the serialized value is absent or null on decode.
    pub default_value: Option<Value>,
    /// Leave a missing value to the type's own construction logic.
    pub value_from_constructor: bool,
    pub skip_encode: bool,
    pub skip_decode: bool,
}

impl FieldDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the same explicit key for both directions.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.encode_key = Some(key.clone());
        self.decode_key = Some(key);
        self
    }

    #[must_use]
    pub fn encode_key(mut self, key: impl Into<String>) -> Self {
        self.encode_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn decode_key(mut self, key: impl Into<String>) -> Self {
        self.decode_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    #[must_use]
    pub fn processor<P: Processor>(mut self, processor: P) -> Self {
        self.processor = Some(ProcessorRef::new(processor));
        self
    }

    /// Attaches an already shared processor handle.
    #[must_use]
    pub fn processor_ref(mut self, processor: ProcessorRef) -> Self {
        self.processor = Some(processor);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn from_constructor(mut self) -> Self {
        self.value_from_constructor = true;
        self
    }

    #[must_use]
    pub fn skip_encode(mut self) -> Self {
        self.skip_encode = true;
        self
    }

    #[must_use]
    pub fn skip_decode(mut self) -> Self {
        self.skip_decode = true;
        self
    }

    /// A descriptor skipped in both directions behaves like an ignored field.
    pub fn is_inert(&self) -> bool {
        self.skip_encode && self.skip_decode
    }

    /// True when both a default value and constructor default are requested.
    pub fn has_ambiguous_default(&self) -> bool {
        self.value_from_constructor && self.default_value.is_some()
    }
}
