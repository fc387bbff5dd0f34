//! Class descriptors authored as TOML documents.
//!
//! ```toml
//! name = "User"
//! naming = "snake_case"
//! ignored = ["passwordHash"]
//! nested_serializers = ["address"]
//!
//! [fields.createdAt]
//! processor = "epoch_millis"
//!
//! [fields.nickname]
//! nullable = true
//! default = "anonymous"
//! ```
//!
//! Processors are referenced by name and bound against a
//! [`ProcessorRegistry`] when the file is turned into a [`ClassDescriptor`].

use crate::descriptor::{ClassDescriptor, FieldDescriptor};
use crate::processor::ProcessorRegistry;
use fieldmap_types::{MapError, NamingConvention, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// The on-disk form of a [`ClassDescriptor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorFile {
    pub name: String,
    #[serde(default = "default_include")]
    pub include_by_default: bool,
    #[serde(default)]
    pub nullable_by_default: bool,
    #[serde(default)]
    pub naming: NamingConvention,
    #[serde(default)]
    pub ignored: Vec<String>,
    #[serde(default)]
    pub nested_serializers: Vec<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldEntry>,
}

fn default_include() -> bool {
    true
}

/// One `[fields.<name>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    /// Key for both directions; `encode_key`/`decode_key` take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encode_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Name of a processor in the binding [`ProcessorRegistry`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub from_constructor: bool,
    #[serde(default)]
    pub skip_encode: bool,
    #[serde(default)]
    pub skip_decode: bool,
}

impl DescriptorFile {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| MapError::DescriptorFile(e.to_string()))
    }

    /// Reads and parses a descriptor file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MapError::DescriptorFile(format!("{}: {e}", path.display())))?;
        let file = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), class = %file.name, "Loaded class descriptor");
        Ok(file)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| MapError::DescriptorFile(e.to_string()))
    }

    /// Builds the descriptor, resolving processor names against `processors`.
    pub fn into_descriptor(self, processors: &ProcessorRegistry) -> Result<ClassDescriptor> {
        let mut class = ClassDescriptor::new(self.name)
            .include_by_default(self.include_by_default)
            .nullable_by_default(self.nullable_by_default)
            .naming(self.naming);
        class.ignored_fields = self.ignored.into_iter().collect::<HashSet<_>>();
        class.nested_serializers = self.nested_serializers;

        for (field, entry) in self.fields {
            let descriptor = entry.into_field_descriptor(&class.name, &field, processors)?;
            class.field_overrides.insert(field, descriptor);
        }

        debug!(
            class = %class.name,
            overrides = class.field_overrides.len(),
            ignored = class.ignored_fields.len(),
            "Built class descriptor from file"
        );
        Ok(class)
    }
}

impl FieldEntry {
    fn into_field_descriptor(
        self,
        class: &str,
        field: &str,
        processors: &ProcessorRegistry,
    ) -> Result<FieldDescriptor> {
        let processor = match self.processor {
            Some(name) => Some(processors.get(&name).cloned().ok_or_else(|| {
                MapError::configuration(
                    class,
                    format!("field '{field}' references unknown processor '{name}'"),
                )
            })?),
            None => None,
        };

        Ok(FieldDescriptor {
            encode_key: self.encode_key.or_else(|| self.key.clone()),
            decode_key: self.decode_key.or(self.key),
            nullable: self.nullable,
            processor,
            default_value: self.default,
            value_from_constructor: self.from_constructor,
            skip_encode: self.skip_encode,
            skip_decode: self.skip_decode,
        })
    }
}

impl ClassDescriptor {
    /// Parses a TOML descriptor and binds its processors.
    pub fn from_toml(contents: &str, processors: &ProcessorRegistry) -> Result<Self> {
        DescriptorFile::from_toml_str(contents)?.into_descriptor(processors)
    }
}
