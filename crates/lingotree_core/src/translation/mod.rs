//! Translation persistence engine.
//!
//! # Responsibility
//! - Define the strategy seam for projecting locale-sensitive fields into and
//!   out of content nodes.
//! - Host the two physical layouts: locale-prefixed attributes vs. one child
//!   node per locale.
//!
//! # Invariants
//! - Each operation is idempotent against the supplied node.
//! - Operations for different locales on the same node never interfere.
//! - Strategies stage node mutations only; durability belongs to the caller's
//!   session save.

use crate::model::document::TranslatableDocument;
use crate::model::metadata::ClassMetadata;
use crate::model::value::TranslationData;
use crate::repo::node::Node;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attribute;
pub mod binder;
pub mod child;
pub mod name;

pub use attribute::AttributeTranslationStrategy;
pub use child::ChildTranslationStrategy;
pub use name::LOCALE_NAMESPACE;

/// Result type used by translation strategy operations.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Errors from translation strategy operations.
#[derive(Debug)]
pub enum TranslationError {
    /// Locale string is empty or contains a reserved separator.
    InvalidLocale(String),
    /// Persisted property cannot be decoded into the mapped field shape.
    InvalidStoredData {
        property: String,
        details: String,
    },
}

impl Display for TranslationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(locale) => write!(f, "invalid locale `{locale}`"),
            Self::InvalidStoredData { property, details } => {
                write!(f, "invalid stored data in property `{property}`: {details}")
            }
        }
    }
}

impl Error for TranslationError {}

/// Persistence strategy for one physical translation layout.
///
/// Implementations are stateless; every call carries the node, metadata and
/// locale it operates on. Callers flush staged node mutations through their
/// content session afterwards.
pub trait TranslationStrategy {
    /// Projects `data` into the node for `locale`.
    ///
    /// Fields absent from `data` are left untouched; explicit nulls are
    /// recorded per layout semantics.
    fn save_translation(
        &self,
        data: &TranslationData,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()>;

    /// Populates `doc` from the node's translation for `locale`.
    ///
    /// Returns `Ok(false)` without touching `doc` when the translation is
    /// absent.
    fn load_translation(
        &self,
        doc: &mut dyn TranslatableDocument,
        node: &Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<bool>;

    /// Removes every trace of `locale`'s translation; other locales survive.
    fn remove_translation(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()>;

    /// Removes every persisted translation on the node.
    fn remove_all_translations(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
    ) -> TranslationResult<()>;

    /// Enumerates locales with at least one persisted translated value.
    ///
    /// No duplicates; enumeration order is not guaranteed.
    fn get_locales_for(
        &self,
        node: &Node,
        metadata: &ClassMetadata,
    ) -> TranslationResult<Vec<String>>;
}
