//! Use-case facades over the translation core.

pub mod translation_service;
