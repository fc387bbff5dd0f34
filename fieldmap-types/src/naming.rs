//! Naming conventions used to derive serialized keys from field identifiers.
//!
//! The transform is ASCII-only and locale independent. Snake and kebab case
//! share one word-splitting rule so that a key derived for encoding is always
//! the key looked up when decoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Case style applied to a field identifier when no explicit key is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Use the identifier as is.
    #[default]
    None,
    /// Identifiers are already camel-cased in memory; same as `None`.
    CamelCase,
    /// `myFieldName` -> `my_field_name`.
    SnakeCase,
    /// `myFieldName` -> `my-field-name`.
    KebabCase,
}

impl NamingConvention {
    /// Derives the serialized key for `identifier`.
    #[must_use]
    pub fn apply(self, identifier: &str) -> String {
        transform(identifier, self)
    }

    const fn separator(self) -> Option<char> {
        match self {
            Self::None | Self::CamelCase => None,
            Self::SnakeCase => Some('_'),
            Self::KebabCase => Some('-'),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::CamelCase => "camel_case",
            Self::SnakeCase => "snake_case",
            Self::KebabCase => "kebab_case",
        };
        f.write_str(name)
    }
}

/// Maps a field identifier to its serialized key under `convention`.
#[must_use]
pub fn transform(identifier: &str, convention: NamingConvention) -> String {
    let Some(sep) = convention.separator() else {
        return identifier.to_string();
    };

    let words = split_words(identifier);
    let mut out = String::with_capacity(identifier.len() + words.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(&word.to_ascii_lowercase());
    }
    out
}

/// Splits an identifier into words.
///
/// A new word starts at a lower-to-upper transition, at a letter/digit
/// boundary, and before the last capital of an acronym that is followed by a
/// lower-case letter (`HTTPServer` -> `HTTP`, `Server`). `_` and `-` are
/// separators and never appear in a word.
#[must_use]
pub fn split_words(identifier: &str) -> Vec<&str> {
    let bytes = identifier.as_bytes();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' || b == b'-' {
            if let Some(s) = start.take() {
                words.push(&identifier[s..i]);
            }
            continue;
        }

        let Some(s) = start else {
            start = Some(i);
            continue;
        };

        // Non-ASCII bytes never open a boundary, so slicing stays on char edges.
        let prev = bytes[i - 1];
        let next = bytes.get(i + 1).copied();
        let boundary = (prev.is_ascii_lowercase() && b.is_ascii_uppercase())
            || (prev.is_ascii_alphabetic() && b.is_ascii_digit())
            || (prev.is_ascii_digit() && b.is_ascii_alphabetic())
            || (prev.is_ascii_uppercase()
                && b.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase()));

        if boundary && i > s {
            words.push(&identifier[s..i]);
            start = Some(i);
        }
    }

    if let Some(s) = start {
        words.push(&identifier[s..]);
    }
    words
}
