use lingotree_core::db::open_db_in_memory;
use lingotree_core::{
    AttributeTranslationStrategy, ClassMetadata, ContentSession, DynamicDocument, FieldValue,
    PropertyValue, StrategyKind, TranslatableDocument, TranslationData, TranslationError,
    TranslationStrategy,
};

fn article_metadata() -> ClassMetadata {
    let mut metadata = ClassMetadata::new("Article", StrategyKind::Attribute);
    metadata.add_translatable_field("topic");
    metadata.add_translatable_field("text");
    metadata.add_translatable_field("nullable");
    metadata.add_translatable_field_with_property("custom_name", "custom-name");
    metadata.add_translatable_map_field("settings");
    metadata
}

fn session_with_article() -> ContentSession {
    let conn = open_db_in_memory().unwrap();
    let mut session = ContentSession::open(conn).unwrap();
    let article = session.root_mut().ensure_child("article");
    article.set_property("author", PropertyValue::Scalar("John Doe".to_string()));
    session
}

fn scalar_prop(value: &str) -> PropertyValue {
    PropertyValue::Scalar(value.to_string())
}

fn sorted(mut locales: Vec<String>) -> Vec<String> {
    locales.sort();
    locales
}

#[test]
fn save_writes_locale_scoped_properties() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    data.set_scalar("text", "Lorem ipsum...");
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    data.set_scalar("topic", "Un sujet intéressant");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();
    session.save().unwrap();

    let node = session.node("/article").unwrap();
    assert_eq!(
        node.property("lingo_locale:en-topic"),
        Some(&scalar_prop("Some interesting subject"))
    );
    assert_eq!(
        node.property("lingo_locale:fr-topic"),
        Some(&scalar_prop("Un sujet intéressant"))
    );
    assert_eq!(
        node.property("lingo_locale:en-text"),
        Some(&scalar_prop("Lorem ipsum..."))
    );
    assert_eq!(
        node.property("lingo_locale:fr-text"),
        Some(&scalar_prop("Lorem ipsum..."))
    );
    // Fields the data never mentioned leave no trace for either locale.
    assert!(!node.has_property("lingo_locale:en-nullable"));
    assert!(!node.has_property("lingo_locale:fr-custom-name"));
    // The untranslated property is untouched.
    assert_eq!(node.property("author"), Some(&scalar_prop("John Doe")));
}

#[test]
fn load_translation_populates_document_per_locale() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    node.set_property("lingo_locale:en-topic", scalar_prop("English topic"));
    node.set_property("lingo_locale:en-text", scalar_prop("English text"));
    node.set_property("lingo_locale:en-custom-name", scalar_prop("Custom value"));
    node.set_property("lingo_locale:fr-topic", scalar_prop("Sujet français"));
    node.set_property("lingo_locale:fr-text", scalar_prop("Texte français"));

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "en").unwrap());
    assert_eq!(doc.scalar("topic"), Some("English topic"));
    assert_eq!(doc.scalar("text"), Some("English text"));
    assert_eq!(doc.scalar("custom_name"), Some("Custom value"));
    // Never persisted and never nulled: the field stays unassigned.
    assert!(!doc.is_assigned("nullable"));

    assert!(strategy.load_translation(&mut doc, node, &metadata, "fr").unwrap());
    assert_eq!(doc.scalar("topic"), Some("Sujet français"));
    assert_eq!(doc.scalar("text"), Some("Texte français"));
    // The French translation never stored these; the English values survive.
    assert_eq!(doc.scalar("custom_name"), Some("Custom value"));
}

#[test]
fn load_missing_translation_returns_false_and_leaves_document() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut doc = DynamicDocument::new();
    doc.set_translated_field("topic", Some(FieldValue::scalar("Pre-existing")));

    assert!(!strategy.load_translation(&mut doc, node, &metadata, "en").unwrap());
    assert_eq!(doc.scalar("topic"), Some("Pre-existing"));
}

#[test]
fn explicit_null_persists_through_sentinel_list() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    data.set_scalar("text", "Lorem ipsum...");
    data.set_scalar("nullable", "not null");
    data.set_scalar("custom_name", "Custom value");
    data.set_map("settings", [("key", "value")]);
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Un sujet intéressant");
    data.set_scalar("text", "Lorem français");
    data.set_null("custom_name");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();

    // The sentinel records the physical property name, once.
    assert_eq!(
        node.property("lingo_locale:frnullfields"),
        Some(&PropertyValue::Multi(vec!["custom-name".to_string()]))
    );
    assert!(!node.has_property("lingo_locale:fr-custom-name"));

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "en").unwrap());
    assert_eq!(doc.scalar("nullable"), Some("not null"));
    assert_eq!(doc.scalar("custom_name"), Some("Custom value"));
    assert_eq!(
        doc.map("settings"),
        Some(&[("key".to_string(), "value".to_string())][..])
    );

    assert!(strategy.load_translation(&mut doc, node, &metadata, "fr").unwrap());
    assert_eq!(doc.scalar("topic"), Some("Un sujet intéressant"));
    assert_eq!(doc.scalar("text"), Some("Lorem français"));
    // Explicitly nulled for fr.
    assert!(doc.is_null("custom_name"));
    // Untouched by the fr save; the en values survive on the document.
    assert_eq!(doc.scalar("nullable"), Some("not null"));
    assert!(doc.map("settings").is_some());
}

#[test]
fn saving_a_value_clears_the_null_sentinel_entry() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Sujet");
    data.set_null("text");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();
    assert_eq!(
        node.property("lingo_locale:frnullfields"),
        Some(&PropertyValue::Multi(vec!["text".to_string()]))
    );

    let mut data = TranslationData::new();
    data.set_scalar("text", "Texte");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();

    // The null set became empty, so the sentinel property is gone entirely.
    assert!(!node.has_property("lingo_locale:frnullfields"));
    assert_eq!(node.property("lingo_locale:fr-text"), Some(&scalar_prop("Texte")));
}

#[test]
fn sub_region_locale_is_fully_distinct() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting american subject");
    strategy.save_translation(&data, node, &metadata, "en_US").unwrap();

    assert_eq!(
        node.property("lingo_locale:en-topic"),
        Some(&scalar_prop("Some interesting subject"))
    );
    assert_eq!(
        node.property("lingo_locale:en_US-topic"),
        Some(&scalar_prop("Some interesting american subject"))
    );

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "en").unwrap());
    assert_eq!(doc.scalar("topic"), Some("Some interesting subject"));
    assert!(strategy.load_translation(&mut doc, node, &metadata, "en_US").unwrap());
    assert_eq!(doc.scalar("topic"), Some("Some interesting american subject"));

    let locales = sorted(strategy.get_locales_for(node, &metadata).unwrap());
    assert_eq!(locales, ["en", "en_US"]);
}

#[test]
fn remove_translation_clears_locale_and_sentinel_only() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    data.set_scalar("text", "Lorem ipsum...");
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "sujet interessant");
    data.set_null("text");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();
    assert!(node.has_property("lingo_locale:fr-topic"));
    assert!(node.has_property("lingo_locale:frnullfields"));

    strategy.remove_translation(node, &metadata, "fr").unwrap();

    assert!(!node.has_property("lingo_locale:fr-topic"));
    assert!(!node.has_property("lingo_locale:fr-text"));
    assert!(!node.has_property("lingo_locale:frnullfields"));
    assert!(node.has_property("lingo_locale:en-topic"));
    assert!(node.has_property("lingo_locale:en-text"));

    let mut doc = DynamicDocument::new();
    assert!(!strategy.load_translation(&mut doc, node, &metadata, "fr").unwrap());
}

#[test]
fn remove_translation_handles_sub_region_locales() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "sujet interessant");
    data.set_null("text");
    strategy.save_translation(&data, node, &metadata, "fr_CA").unwrap();
    assert!(node.has_property("lingo_locale:fr_CA-topic"));
    assert!(node.has_property("lingo_locale:fr_CAnullfields"));

    strategy.remove_translation(node, &metadata, "fr_CA").unwrap();

    assert!(!node.has_property("lingo_locale:fr_CA-topic"));
    assert!(!node.has_property("lingo_locale:fr_CAnullfields"));
    assert!(node.has_property("lingo_locale:en-topic"));
}

#[test]
fn remove_all_translations_empties_locale_enumeration() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    for (locale, topic) in [("en", "English"), ("fr", "Français"), ("de", "Deutsch")] {
        let mut data = TranslationData::new();
        data.set_scalar("topic", topic);
        data.set_scalar("text", "text");
        strategy.save_translation(&data, node, &metadata, locale).unwrap();
    }
    assert_eq!(strategy.get_locales_for(node, &metadata).unwrap().len(), 3);

    strategy.remove_all_translations(node, &metadata).unwrap();

    assert!(strategy.get_locales_for(node, &metadata).unwrap().is_empty());
    assert_eq!(node.property("author"), Some(&scalar_prop("John Doe")));
}

#[test]
fn locale_enumeration_skips_sentinels_and_unrelated_properties() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    node.set_property("lingo_locale:en-topic", scalar_prop("English topic"));
    node.set_property("lingo_locale:de-topic", scalar_prop("Deutscher Betreff"));
    // A locale whose only artifact is the sentinel is not a translation.
    node.set_property(
        "lingo_locale:frnullfields",
        PropertyValue::Multi(vec!["text".to_string()]),
    );

    let locales = sorted(strategy.get_locales_for(node, &metadata).unwrap());
    assert_eq!(locales, ["de", "en"]);
}

#[test]
fn map_fields_round_trip_in_entry_order() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Some interesting subject");
    data.set_map(
        "settings",
        [("is-active", "true"), ("url", "great-article-in-english.html")],
    );
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Un sujet intéressant");
    data.set_map(
        "settings",
        [("is-active", "true"), ("url", "super-article-en-francais.html")],
    );
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "en").unwrap());
    assert_eq!(
        doc.map("settings"),
        Some(
            &[
                ("is-active".to_string(), "true".to_string()),
                ("url".to_string(), "great-article-in-english.html".to_string()),
            ][..]
        )
    );

    assert!(strategy.load_translation(&mut doc, node, &metadata, "fr").unwrap());
    assert_eq!(
        doc.map("settings"),
        Some(
            &[
                ("is-active".to_string(), "true".to_string()),
                ("url".to_string(), "super-article-en-francais.html".to_string()),
            ][..]
        )
    );
}

#[test]
fn corrupted_map_property_surfaces_invalid_stored_data() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    node.set_property("lingo_locale:en-topic", scalar_prop("English topic"));
    node.set_property(
        "lingo_locale:en-settings",
        PropertyValue::Multi(vec!["orphan-key".to_string()]),
    );

    let mut doc = DynamicDocument::new();
    let err = strategy
        .load_translation(&mut doc, node, &metadata, "en")
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidStoredData { .. }));
}

#[test]
fn locales_with_reserved_separators_are_rejected() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "Subject");

    let err = strategy
        .save_translation(&data, node, &metadata, "en-US")
        .unwrap_err();
    assert!(matches!(err, TranslationError::InvalidLocale(locale) if locale == "en-US"));

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "").is_err());
}

#[test]
fn spec_scenario_null_text_and_removal() {
    let mut session = session_with_article();
    let metadata = article_metadata();
    let strategy = AttributeTranslationStrategy::new();
    let node = session.node_mut("/article").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "T1");
    data.set_scalar("text", "X1");
    strategy.save_translation(&data, node, &metadata, "en").unwrap();

    let mut data = TranslationData::new();
    data.set_scalar("topic", "T2");
    data.set_null("text");
    strategy.save_translation(&data, node, &metadata, "fr").unwrap();

    let mut doc = DynamicDocument::new();
    assert!(strategy.load_translation(&mut doc, node, &metadata, "fr").unwrap());
    assert_eq!(doc.scalar("topic"), Some("T2"));
    assert!(doc.is_null("text"));

    let locales = sorted(strategy.get_locales_for(node, &metadata).unwrap());
    assert_eq!(locales, ["en", "fr"]);

    strategy.remove_translation(node, &metadata, "fr").unwrap();
    let locales = strategy.get_locales_for(node, &metadata).unwrap();
    assert_eq!(locales, ["en"]);
}
