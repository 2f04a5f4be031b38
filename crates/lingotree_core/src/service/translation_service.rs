//! Document translation use-case facade.
//!
//! # Responsibility
//! - Select the translation strategy configured on class metadata.
//! - Drive save/load/remove/enumerate for whole documents.
//! - Resolve "best available locale" loads through the fallback chooser.
//!
//! # Invariants
//! - Strategies stay single-locale primitives; fallback walking lives here.
//! - Load failure across the whole chain leaves the document untouched.

use crate::locale::chooser::LocaleChooser;
use crate::model::document::TranslatableDocument;
use crate::model::metadata::{ClassMetadata, StrategyKind};
use crate::repo::node::Node;
use crate::translation::attribute::AttributeTranslationStrategy;
use crate::translation::binder::extract_data;
use crate::translation::child::ChildTranslationStrategy;
use crate::translation::{TranslationResult, TranslationStrategy};
use log::debug;

/// Facade standing where the document manager's flush/load pipeline would.
#[derive(Debug, Clone)]
pub struct TranslationService {
    attribute: AttributeTranslationStrategy,
    child: ChildTranslationStrategy,
    chooser: LocaleChooser,
}

impl TranslationService {
    /// Creates a service resolving fallbacks through `chooser`.
    pub fn new(chooser: LocaleChooser) -> Self {
        Self {
            attribute: AttributeTranslationStrategy::new(),
            child: ChildTranslationStrategy::new(),
            chooser,
        }
    }

    /// Strategy instance for one configured layout.
    pub fn strategy_for(&self, kind: StrategyKind) -> &dyn TranslationStrategy {
        match kind {
            StrategyKind::Attribute => &self.attribute,
            StrategyKind::Child => &self.child,
        }
    }

    /// Extracts the document's translatable fields and saves them for
    /// `locale`. Staged mutations become durable on the session save.
    pub fn save_document(
        &self,
        doc: &dyn TranslatableDocument,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        let data = extract_data(doc, metadata);
        let strategy = self.strategy_for(metadata.strategy());
        strategy.save_translation(&data, node, metadata, locale)?;
        debug!(
            "event=translation_save module=service status=ok class={} locale={locale} fields={}",
            metadata.document_class(),
            data.len()
        );
        Ok(())
    }

    /// Loads the best available translation for `locale`, walking the
    /// fallback chain. Returns the locale that loaded, or `None` when the
    /// chain is exhausted (the document is untouched in that case).
    pub fn load_document(
        &self,
        doc: &mut dyn TranslatableDocument,
        node: &Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<Option<String>> {
        let strategy = self.strategy_for(metadata.strategy());
        for candidate in self.chooser.fallbacks_for(locale) {
            if strategy.load_translation(doc, node, metadata, &candidate)? {
                debug!(
                    "event=translation_load module=service status=ok class={} requested={locale} resolved={candidate}",
                    metadata.document_class()
                );
                return Ok(Some(candidate));
            }
        }
        debug!(
            "event=translation_load module=service status=missing class={} requested={locale}",
            metadata.document_class()
        );
        Ok(None)
    }

    /// Removes one locale's translation from the node.
    pub fn remove_translation(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
        locale: &str,
    ) -> TranslationResult<()> {
        self.strategy_for(metadata.strategy())
            .remove_translation(node, metadata, locale)
    }

    /// Removes every persisted translation from the node.
    pub fn remove_all_translations(
        &self,
        node: &mut Node,
        metadata: &ClassMetadata,
    ) -> TranslationResult<()> {
        self.strategy_for(metadata.strategy())
            .remove_all_translations(node, metadata)
    }

    /// Enumerates locales persisted on the node.
    pub fn locales_of(
        &self,
        node: &Node,
        metadata: &ClassMetadata,
    ) -> TranslationResult<Vec<String>> {
        self.strategy_for(metadata.strategy())
            .get_locales_for(node, metadata)
    }
}
