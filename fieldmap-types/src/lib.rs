//! Core type definitions for fieldmap.
//!
//! This crate defines the plain types every other fieldmap crate depends on:
//! - [`NamingConvention`] and the key-derivation transform it drives
//! - [`FieldType`] / [`FieldInfo`], the declared shape of a class's fields
//! - [`KeyedData`], the string-keyed dynamic representation produced by encode
//! - [`MapError`], the single error type reported by resolution, encode and decode
//!
//! Nothing here knows about descriptors or processors; those live in
//! `fieldmap-model`.

mod field;
mod naming;

pub use field::{FieldInfo, FieldType, KeyedData, kind_of};
pub use naming::{NamingConvention, split_words, transform};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors reported by field resolution, encoding and decoding.
///
/// All variants are deterministic data or configuration defects; callers are
/// not expected to retry. The enum is `Clone` so that a failed resolution can
/// be memoized and handed to every caller that asks for the same class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Descriptors contradict each other, or a collaborator lookup failed.
    #[error("configuration error in '{class}': {detail}")]
    Configuration { class: String, detail: String },

    /// A non-nullable field held a logical null while encoding.
    #[error("field '{class}.{field}' is not nullable but has no value")]
    Nullability { class: String, field: String },

    /// A required key was absent while decoding and no default strategy applies.
    #[error("missing required field '{class}.{field}' (expected key '{key}')")]
    MissingField {
        class: String,
        field: String,
        key: String,
    },

    /// A value did not match the field's declared type.
    #[error("type mismatch for '{class}.{field}': expected {expected}, {detail}")]
    TypeMismatch {
        class: String,
        field: String,
        expected: String,
        detail: String,
    },

    /// The construction collaborator rejected the decoded values.
    #[error("failed to construct '{class}': {detail}")]
    Construction { class: String, detail: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("descriptor file error: {0}")]
    DescriptorFile(String),
}

impl MapError {
    /// Shorthand for a [`MapError::Configuration`].
    pub fn configuration(class: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Configuration {
            class: class.into(),
            detail: detail.into(),
        }
    }

    /// Returns the class name the error refers to, if any.
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::Configuration { class, .. }
            | Self::Nullability { class, .. }
            | Self::MissingField { class, .. }
            | Self::TypeMismatch { class, .. }
            | Self::Construction { class, .. } => Some(class),
            Self::Serialization(_) | Self::DescriptorFile(_) => None,
        }
    }

    /// Returns the field name the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Nullability { field, .. }
            | Self::MissingField { field, .. }
            | Self::TypeMismatch { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
