//! Per-class translation mapping metadata.
//!
//! # Responsibility
//! - Describe which document fields are translatable and how they persist.
//! - Carry the translation strategy configured for the class.
//!
//! # Invariants
//! - Field order is the declaration order and drives strategy iteration.
//! - Every translatable field owns exactly one mapping; a field without a
//!   resolvable physical name cannot be represented.

use serde::{Deserialize, Serialize};

/// Physical layout used to persist a class's translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Locale-prefixed properties directly on the document node.
    Attribute,
    /// One child node per locale with plain property names.
    Child,
}

/// Persistence mapping of one translatable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Physical property name; defaults to the field name.
    pub property: String,
    /// Whether the field holds an ordered string map instead of a scalar.
    pub is_map: bool,
}

/// Static description of one document class's translatable surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    document_class: String,
    strategy: StrategyKind,
    fields: Vec<(String, FieldMapping)>,
}

impl ClassMetadata {
    /// Creates metadata for `document_class` with no translatable fields yet.
    pub fn new(document_class: impl Into<String>, strategy: StrategyKind) -> Self {
        Self {
            document_class: document_class.into(),
            strategy,
            fields: Vec::new(),
        }
    }

    /// Declares a scalar translatable field persisted under its own name.
    pub fn add_translatable_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        let property = field.clone();
        self.add_field(field, property, false);
    }

    /// Declares a scalar translatable field with an overridden property name.
    pub fn add_translatable_field_with_property(
        &mut self,
        field: impl Into<String>,
        property: impl Into<String>,
    ) {
        self.add_field(field.into(), property.into(), false);
    }

    /// Declares an ordered-map translatable field persisted under its own name.
    pub fn add_translatable_map_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        let property = field.clone();
        self.add_field(field, property, true);
    }

    fn add_field(&mut self, field: String, property: String, is_map: bool) {
        // Re-declaring a field replaces its mapping in place, keeping the
        // original declaration order.
        if let Some(entry) = self.fields.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = FieldMapping { property, is_map };
            return;
        }
        self.fields.push((field, FieldMapping { property, is_map }));
    }

    pub fn document_class(&self) -> &str {
        &self.document_class
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Ordered (field name, mapping) pairs for every translatable field.
    pub fn translated_fields(&self) -> impl Iterator<Item = (&str, &FieldMapping)> {
        self.fields
            .iter()
            .map(|(field, mapping)| (field.as_str(), mapping))
    }

    /// Mapping for one field, if it is translatable.
    pub fn field_mapping(&self, field: &str) -> Option<&FieldMapping> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, mapping)| mapping)
    }

    pub fn has_translatable_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}
