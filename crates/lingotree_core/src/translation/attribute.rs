//! Attribute translation strategy: locale-prefixed properties on the node.
//!
//! # Responsibility
//! - Persist every translated field of locale L at its composite key on the
//!   document node itself.
//! - Track explicitly nulled properties per locale in a sentinel list so load
//!   can tell null from never-set.
//!
//! # Invariants
//! - Composite keys are injective over (locale, property); locales never
//!   share keys.
//! - The sentinel property exists exactly when the null set is non-empty.
//! - Locale enumeration never reports sentinel keys.

use crate::model::document::TranslatableDocument;
use crate::model::metadata::ClassMetadata;
use crate::model::value::{FieldState, PropertyValue, TranslationData};
use crate::repo::node::Node;
use crate::translation::binder::{field_from_property, property_from_field};
use crate::translation::name::{
    locale_from_property_name, null_fields_property_name, translated_property_name,
    validate_locale,
};
use crate::translation::{TranslationResult, TranslationStrategy};
use std::collections::BTreeSet;

/// Flat-attribute layout strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeTranslationStrategy;

impl AttributeTranslationStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl TranslationStrategy for AttributeTranslationStrategy {
    fn save_translation(
        &self,
        data: &TranslationData,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        validate_locale(locale)?;

        let sentinel_key = null_fields_property_name(locale);
        let mut null_properties = read_null_properties(node, &sentinel_key);

        for (field, mapping) in metadata.translated_fields() {
            let key = translated_property_name(locale, &mapping.property);
            match data.state_of(field) {
                FieldState::Untouched => {}
                FieldState::Value(value) => {
                    node.set_property(key, property_from_field(value, mapping));
                    null_properties.retain(|property| property != &mapping.property);
                }
                FieldState::Null => {
                    node.remove_property(&key);
                    if !null_properties.iter().any(|p| p == &mapping.property) {
                        null_properties.push(mapping.property.clone());
                    }
                }
            }
        }

        if null_properties.is_empty() {
            node.remove_property(&sentinel_key);
        } else {
            node.set_property(sentinel_key, PropertyValue::Multi(null_properties));
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

        // Representative-field existence policy: the first translatable
        // field's property decides whether this locale is persisted at all.
        let Some((_, first_mapping)) = metadata.translated_fields().next() else {
            return Ok(false);
        };
        if !node.has_property(&translated_property_name(locale, &first_mapping.property)) {
            return Ok(false);
        }

        let sentinel_key = null_fields_property_name(locale);
        let null_properties = read_null_properties(node, &sentinel_key);

        for (field, mapping) in metadata.translated_fields() {
            let key = translated_property_name(locale, &mapping.property);
            if let Some(value) = node.property(&key) {
                let decoded = field_from_property(value, mapping, &key)?;
                doc.set_translated_field(field, Some(decoded));
            } else if null_properties.iter().any(|p| p == &mapping.property) {
                doc.set_translated_field(field, None);
            }
            // Neither stored nor nulled: the document keeps its prior value.
        }

        Ok(true)
    }

    fn remove_translation(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        validate_locale(locale)?;

        for (_, mapping) in metadata.translated_fields() {
            node.remove_property(&translated_property_name(locale, &mapping.property));
        }
        node.remove_property(&null_fields_property_name(locale));
        Ok(())
    }

    fn remove_all_translations(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
    ) -> TranslationResult<()> {
        for locale in self.get_locales_for(node, metadata)? {
            self.remove_translation(node, metadata, &locale)?;
        }
        Ok(())
    }

    fn get_locales_for(
        &self,
        node: &Node,
        _metadata: &ClassMetadata,
    ) -> TranslationResult<Vec<String>> {
        let locales: BTreeSet<&str> = node
            .property_names()
            .filter_map(locale_from_property_name)
            .collect();
        Ok(locales.into_iter().map(str::to_string).collect())
    }
}

/// Reads the ordered null-property list persisted under the sentinel key.
fn read_null_properties(node: &Node, sentinel_key: &str) -> Vec<String> {
    match node.property(sentinel_key) {
        Some(PropertyValue::Multi(items)) => items.clone(),
        Some(PropertyValue::Scalar(item)) => vec![item.clone()],
        None => Vec::new(),
    }
}
