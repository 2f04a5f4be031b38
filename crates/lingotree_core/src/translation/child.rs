//! Child translation strategy: one child node per locale.
//!
//! # Responsibility
//! - Persist each locale's translated fields as plain-named properties on a
//!   dedicated child node.
//! - Remove a locale by dropping its child subtree.
//!
//! # Invariants
//! - Child names are injective over locale strings.
//! - A null save deletes the property: explicit-null and never-set collapse
//!   to property-absent on the child node, and load leaves such fields
//!   untouched. This layout has no sentinel mechanism, unlike the attribute
//!   layout.

use crate::model::document::TranslatableDocument;
use crate::model::metadata::ClassMetadata;
use crate::model::value::{FieldState, TranslationData};
use crate::repo::node::Node;
use crate::translation::binder::{field_from_property, property_from_field};
use crate::translation::name::{child_node_name, locale_from_child_name, validate_locale};
use crate::translation::{TranslationResult, TranslationStrategy};

/// Child-node layout strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildTranslationStrategy;

impl ChildTranslationStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl TranslationStrategy for ChildTranslationStrategy {
    fn save_translation(
        &self,
        data: &TranslationData,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        validate_locale(locale)?;

        let translation_node = node.ensure_child(&child_node_name(locale));
        for (field, mapping) in metadata.translated_fields() {
            match data.state_of(field) {
                FieldState::Untouched => {}
                FieldState::Value(value) => {
                    translation_node
                        .set_property(mapping.property.clone(), property_from_field(value, mapping));
                }
                FieldState::Null => {
                    translation_node.remove_property(&mapping.property);
                }
            }
        }

        Ok(())
    }

    fn load_translation(
        &self,
        doc: &mut dyn TranslatableDocument,
        node: &Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<bool> {
        validate_locale(locale)?;

        let Some(translation_node) = node.child(&child_node_name(locale)) else {
            return Ok(false);
        };

        for (field, mapping) in metadata.translated_fields() {
            if let Some(value) = translation_node.property(&mapping.property) {
                let decoded = field_from_property(value, mapping, &mapping.property)?;
                doc.set_translated_field(field, Some(decoded));
            }
            // Absent property: the document keeps its prior value.
        }

        Ok(true)
    }

    fn remove_translation(
        &self,
        node: &mut Node,
        _metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        validate_locale(locale)?;
        node.remove_child(&child_node_name(locale));
        Ok(())
    }

    fn remove_all_translations(
        &self,
        node: &mut Node,
        _metadata: &ClassMetadata,
    ) -> TranslationResult<()> {
        let translation_nodes: Vec<String> = node
            .child_names()
            .filter(|name| locale_from_child_name(name).is_some())
            .map(str::to_string)
            .collect();
        for name in translation_nodes {
            node.remove_child(&name);
        }
        Ok(())
    }

    fn get_locales_for(
        &self,
        node: &Node,
        _metadata: &ClassMetadata,
    ) -> TranslationResult<Vec<String>> {
        Ok(node
            .child_names()
            .filter_map(locale_from_child_name)
            .map(str::to_string)
            .collect())
    }
}
