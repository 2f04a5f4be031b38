//! Locale fallback configuration and resolution.

pub mod chooser;
