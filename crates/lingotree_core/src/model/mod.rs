//! Domain model: mapping metadata, translated values, document seam.

pub mod document;
pub mod metadata;
pub mod value;
