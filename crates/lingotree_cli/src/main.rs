//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lingotree_core` wiring.
//! - Drive one in-memory translation round trip with deterministic output.

use lingotree_core::db::open_db_in_memory;
use lingotree_core::{
    ClassMetadata, ContentSession, DynamicDocument, FieldValue, LocaleChooser, LocaleConfig,
    StrategyKind, TranslatableDocument, TranslationService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("lingotree_core version={}", lingotree_core::core_version());
    match smoke_round_trip() {
        Ok(resolved) => {
            println!("smoke round-trip ok resolved_locale={resolved}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("smoke round-trip failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn smoke_round_trip() -> Result<String, String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let mut session = ContentSession::open(conn).map_err(|err| err.to_string())?;

    let mut metadata = ClassMetadata::new("SmokeArticle", StrategyKind::Attribute);
    metadata.add_translatable_field("topic");

    let chooser = LocaleChooser::new(LocaleConfig::with_default("en"))
        .map_err(|err| err.to_string())?;
    let service = TranslationService::new(chooser);

    let mut doc = DynamicDocument::new();
    doc.set_translated_field("topic", Some(FieldValue::scalar("Hello")));

    let article = session.root_mut().ensure_child("smoke-article");
    service
        .save_document(&doc, article, &metadata, "en")
        .map_err(|err| err.to_string())?;
    session.save().map_err(|err| err.to_string())?;

    let mut reloaded = DynamicDocument::new();
    let node = session
        .node("/smoke-article")
        .ok_or("smoke article node missing after save")?;
    let resolved = service
        .load_document(&mut reloaded, node, &metadata, "en")
        .map_err(|err| err.to_string())?
        .ok_or("translation missing after save")?;

    if reloaded.scalar("topic") != Some("Hello") {
        return Err("topic did not round-trip".to_string());
    }
    Ok(resolved)
}
