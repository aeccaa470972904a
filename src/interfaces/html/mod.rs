//! Skin extraction from weapon pages.

pub mod markup;
pub mod skin_extractor;

pub use skin_extractor::SkinExtractor;
