//! Document-side field access seam.
//!
//! # Responsibility
//! - Define how strategies read and write a document's translated fields.
//! - Provide a map-backed document for callers without a fixed struct shape.
//!
//! # Invariants
//! - Assigning `None` nulls a field; a field a strategy never assigns keeps
//!   its previous in-memory value.

use crate::model::value::FieldValue;
use std::collections::BTreeMap;

/// A document whose translated fields can be read and written by name.
///
/// Typed documents implement this over their own struct fields; schemaless
/// callers can use [`DynamicDocument`].
pub trait TranslatableDocument {
    /// Current value of `field`; `None` when the field is null or never set.
    fn translated_field(&self, field: &str) -> Option<FieldValue>;

    /// Assigns `field`; `None` nulls it.
    fn set_translated_field(&mut self, field: &str, value: Option<FieldValue>);
}

/// Map-backed [`TranslatableDocument`] keeping never-set and explicitly-null
/// fields distinguishable, which load tests lean on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicDocument {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl DynamicDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar payload of `field`, if present and scalar.
    pub fn scalar(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Some(FieldValue::Scalar(value))) => Some(value),
            _ => None,
        }
    }

    /// Map payload of `field`, if present and map-typed.
    pub fn map(&self, field: &str) -> Option<&[(String, String)]> {
        match self.fields.get(field) {
            Some(Some(FieldValue::Map(pairs))) => Some(pairs),
            _ => None,
        }
    }

    /// Whether `field` was ever assigned (including assigned null).
    pub fn is_assigned(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether `field` was explicitly assigned null.
    pub fn is_null(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(None))
    }
}

impl TranslatableDocument for DynamicDocument {
    fn translated_field(&self, field: &str) -> Option<FieldValue> {
        self.fields.get(field).and_then(Clone::clone)
    }

    fn set_translated_field(&mut self, field: &str, value: Option<FieldValue>) {
        self.fields.insert(field.to_string(), value);
    }
}
