//! Translated value model shared by strategies and documents.
//!
//! # Responsibility
//! - Define the physical property payload stored on content nodes.
//! - Define the logical field values carried between documents and strategies.
//! - Keep the three-way per-field state (untouched / null / value) explicit.
//!
//! # Invariants
//! - A `TranslationData` entry is either a value or an explicit null; a field
//!   never mentioned stays out of the map entirely.
//! - Map field entry order is preserved end to end.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Physical payload of one node property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Single string value.
    Scalar(String),
    /// Ordered list of string values.
    Multi(Vec<String>),
}

impl PropertyValue {
    /// Returns the scalar payload, if this is a scalar property.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Multi(_) => None,
        }
    }

    /// Returns the list payload, if this is a multi-valued property.
    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            Self::Scalar(_) => None,
            Self::Multi(items) => Some(items),
        }
    }
}

/// Logical value of one translated document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Plain string field.
    Scalar(String),
    /// Ordered map field; entry order is significant.
    Map(Vec<(String, String)>),
}

impl FieldValue {
    /// Convenience constructor for scalar values.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Convenience constructor for map values from ordered pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Per-field state inside one [`TranslationData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState<'a> {
    /// Field not mentioned by this operation; the stored and in-memory value
    /// must survive unchanged.
    Untouched,
    /// Field explicitly nulled for this locale.
    Null,
    /// Field carries a value.
    Value(&'a FieldValue),
}

/// Flat field-name to value mapping exchanged with a translation strategy.
///
/// Instances are ephemeral: built fresh per save from a document, consumed
/// fresh per load into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationData {
    entries: BTreeMap<String, Option<FieldValue>>,
}

impl TranslationData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scalar value for `field`.
    pub fn set_scalar(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.set(field, Some(FieldValue::scalar(value)));
    }

    /// Records an ordered map value for `field`.
    pub fn set_map<K, V>(&mut self, field: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set(field, Some(FieldValue::map(pairs)));
    }

    /// Records an explicit null for `field`.
    pub fn set_null(&mut self, field: impl Into<String>) {
        self.set(field, None);
    }

    /// Records `value` for `field`; `None` means explicit null.
    pub fn set(&mut self, field: impl Into<String>, value: Option<FieldValue>) {
        self.entries.insert(field.into(), value);
    }

    /// Returns the state of `field` for this operation.
    pub fn state_of(&self, field: &str) -> FieldState<'_> {
        match self.entries.get(field) {
            None => FieldState::Untouched,
            Some(None) => FieldState::Null,
            Some(Some(value)) => FieldState::Value(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over recorded fields; `None` values are explicit nulls.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<FieldValue>> {
        self.entries.iter()
    }
}
