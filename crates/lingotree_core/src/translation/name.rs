//! Physical naming codec for translated storage keys.
//!
//! # Responsibility
//! - Derive attribute-layout property keys and child-layout node names from
//!   (locale, property) pairs.
//! - Extract locales back out of stored names during enumeration.
//! - Enforce the locale character rules that keep the codec injective.
//!
//! # Invariants
//! - Key formats are wire-compatible and must not change:
//!   `lingo_locale:<locale>-<property>`, `lingo_locale:<locale>nullfields`,
//!   child nodes `lingo_locale:<locale>`.
//! - The null-fields sentinel has no separator before the literal, so it can
//!   never match the field-key pattern during locale enumeration.

use crate::translation::{TranslationError, TranslationResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Namespace prefix reserved for translated storage names.
pub const LOCALE_NAMESPACE: &str = "lingo_locale";

/// Suffix of the per-locale sentinel listing explicitly nulled properties.
const NULL_FIELDS_SUFFIX: &str = "nullfields";

static FIELD_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{LOCALE_NAMESPACE}:([^-]+)-.+$")).expect("valid field key regex")
});

/// Storage key of `property` translated into `locale` (attribute layout).
pub fn translated_property_name(locale: &str, property: &str) -> String {
    format!("{LOCALE_NAMESPACE}:{locale}-{property}")
}

/// Sentinel key persisting the set of explicitly nulled properties of `locale`.
pub fn null_fields_property_name(locale: &str) -> String {
    format!("{LOCALE_NAMESPACE}:{locale}{NULL_FIELDS_SUFFIX}")
}

/// Name of the child node holding `locale`'s translation (child layout).
pub fn child_node_name(locale: &str) -> String {
    format!("{LOCALE_NAMESPACE}:{locale}")
}

/// Extracts the locale from an attribute-layout field key.
///
/// Sentinel keys and unrelated properties yield `None`.
pub fn locale_from_property_name(name: &str) -> Option<&str> {
    FIELD_KEY_RE
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str())
}

/// Extracts the locale from a child-layout node name.
pub fn locale_from_child_name(name: &str) -> Option<&str> {
    let locale = name.strip_prefix(LOCALE_NAMESPACE)?.strip_prefix(':')?;
    if locale.is_empty() {
        return None;
    }
    Some(locale)
}

/// Rejects locales that would break codec injectivity.
///
/// `-` is the private field-key separator, `:` the namespace separator and
/// `/` a path separator in the backing store; none may appear in a locale.
pub fn validate_locale(locale: &str) -> TranslationResult<()> {
    if locale.is_empty() || locale.contains(['-', ':', '/']) {
        return Err(TranslationError::InvalidLocale(locale.to_string()));
    }
    Ok(())
}
