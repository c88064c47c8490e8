//! Layout analysis for OCR documents.
//!
//! Aggregates font usage and line geometry into robust reference values that
//! the resolvers use to judge line and paragraph boundaries.

mod frequency;
mod statistics;

pub use frequency::Frequency;
pub use statistics::{avg_word_space, roughly_same_font, LayoutStatistics};
