//! Field binder between documents, translation data and node properties.
//!
//! # Responsibility
//! - Extract a flat field mapping from a document ahead of a save.
//! - Convert logical field values to and from physical property payloads,
//!   respecting the mapped field shape (scalar vs. ordered map).
//!
//! # Invariants
//! - Map fields persist as one interleaved `[k1, v1, k2, v2, ...]` list;
//!   entry order survives the round trip.
//! - Decoding rejects payloads that do not fit the mapped shape instead of
//!   guessing.

use crate::model::document::TranslatableDocument;
use crate::model::metadata::{ClassMetadata, FieldMapping};
use crate::model::value::{FieldValue, PropertyValue, TranslationData};
use crate::translation::{TranslationError, TranslationResult};

/// Builds the flat data mapping a strategy consumes from `doc`.
///
/// Every translatable field is recorded: current values as values, unset or
/// null fields as explicit nulls. This mirrors what a unit of work hands a
/// strategy when flushing a managed document.
pub fn extract_data(doc: &dyn TranslatableDocument, metadata: &ClassMetadata) -> TranslationData {
    let mut data = TranslationData::new();
    for (field, _) in metadata.translated_fields() {
        data.set(field, doc.translated_field(field));
    }
    data
}

/// Encodes a logical field value into its physical property payload.
pub fn property_from_field(value: &FieldValue, mapping: &FieldMapping) -> PropertyValue {
    match value {
        FieldValue::Scalar(item) => PropertyValue::Scalar(item.clone()),
        FieldValue::Map(pairs) => {
            let mut items = Vec::with_capacity(pairs.len() * 2);
            for (key, item) in pairs {
                items.push(key.clone());
                items.push(item.clone());
            }
            debug_assert!(mapping.is_map);
            PropertyValue::Multi(items)
        }
    }
}

/// Decodes a stored property payload into the mapped field shape.
pub fn field_from_property(
    value: &PropertyValue,
    mapping: &FieldMapping,
    property_name: &str,
) -> TranslationResult<FieldValue> {
    if mapping.is_map {
        let items = value.as_multi().ok_or_else(|| TranslationError::InvalidStoredData {
            property: property_name.to_string(),
            details: "expected interleaved list for map field, found scalar".to_string(),
        })?;
        if items.len() % 2 != 0 {
            return Err(TranslationError::InvalidStoredData {
                property: property_name.to_string(),
                details: format!("interleaved map list has odd length {}", items.len()),
            });
        }
        let pairs = items
            .chunks_exact(2)
            .map(|chunk| (chunk[0].clone(), chunk[1].clone()))
            .collect();
        return Ok(FieldValue::Map(pairs));
    }

    let item = value.as_scalar().ok_or_else(|| TranslationError::InvalidStoredData {
        property: property_name.to_string(),
        details: "expected scalar for scalar field, found list".to_string(),
    })?;
    Ok(FieldValue::Scalar(item.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{extract_data, field_from_property, property_from_field};
    use crate::model::document::{DynamicDocument, TranslatableDocument};
    use crate::model::metadata::{ClassMetadata, FieldMapping, StrategyKind};
    use crate::model::value::{FieldState, FieldValue, PropertyValue};
    use crate::translation::TranslationError;

    fn scalar_mapping() -> FieldMapping {
        FieldMapping {
            property: "topic".to_string(),
            is_map: false,
        }
    }

    fn map_mapping() -> FieldMapping {
        FieldMapping {
            property: "settings".to_string(),
            is_map: true,
        }
    }

    #[test]
    fn map_fields_interleave_and_deinterleave_in_order() {
        let value = FieldValue::map([("is-active", "true"), ("url", "a.html")]);
        let property = property_from_field(&value, &map_mapping());
        assert_eq!(
            property,
            PropertyValue::Multi(vec![
                "is-active".to_string(),
                "true".to_string(),
                "url".to_string(),
                "a.html".to_string(),
            ])
        );

        let decoded = field_from_property(&property, &map_mapping(), "settings").unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn odd_length_map_list_is_invalid_stored_data() {
        let property = PropertyValue::Multi(vec!["only-a-key".to_string()]);
        let err = field_from_property(&property, &map_mapping(), "settings").unwrap_err();
        assert!(matches!(
            err,
            TranslationError::InvalidStoredData { property, .. } if property == "settings"
        ));
    }

    #[test]
    fn list_where_scalar_expected_is_invalid_stored_data() {
        let property = PropertyValue::Multi(vec!["a".to_string(), "b".to_string()]);
        assert!(field_from_property(&property, &scalar_mapping(), "topic").is_err());
    }

    #[test]
    fn extract_data_records_unset_fields_as_null() {
        let mut metadata = ClassMetadata::new("Article", StrategyKind::Attribute);
        metadata.add_translatable_field("topic");
        metadata.add_translatable_field("text");

        let mut doc = DynamicDocument::new();
        doc.set_translated_field("topic", Some(FieldValue::scalar("Subject")));

        let data = extract_data(&doc, &metadata);
        assert!(matches!(data.state_of("topic"), FieldState::Value(_)));
        assert_eq!(data.state_of("text"), FieldState::Null);
    }
}
