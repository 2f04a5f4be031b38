//! Core translation persistence engine for the LingoTree content store.
//! This crate is the single source of truth for translation layout semantics.

pub mod db;
pub mod locale;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod translation;

pub use locale::chooser::{LocaleChooser, LocaleConfig, LocaleError, LocaleResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DynamicDocument, TranslatableDocument};
pub use model::metadata::{ClassMetadata, FieldMapping, StrategyKind};
pub use model::value::{FieldState, FieldValue, PropertyValue, TranslationData};
pub use repo::node::{Node, NodeId};
pub use repo::session::{ContentSession, StoreError, StoreResult};
pub use service::translation_service::TranslationService;
pub use translation::{
    AttributeTranslationStrategy, ChildTranslationStrategy, TranslationError, TranslationResult,
    TranslationStrategy, LOCALE_NAMESPACE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
