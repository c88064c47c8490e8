//! Scorer-backed layout decisions.
//!
//! - [`LineBreakResolver`]: dehyphenation inside a paragraph
//! - [`ParagraphMergeResolver`]: joining paragraphs split by a layout boundary
//! - [`DuplicateFilter`]: collapsing running headers and footers
//!
//! The resolvers work on plain word tokens: a line is a `Vec<String>` whose
//! words contain no whitespace, except that the last word may carry trailing
//! whitespace or an explicit end-of-line marker.

mod duplicates;
mod linebreak;
mod merge;

pub use duplicates::{
    group_points, group_text, super_similar, DuplicateFilter, SimilarityThresholds, TieBreak,
};
pub use linebreak::{dehyphenate, Join, LineBreakResolver};
pub use merge::{merge_paragraphs, MergeChoice, ParagraphMergeResolver};

/// A line as an ordered sequence of word tokens.
pub type WordLine = Vec<String>;

/// Marker for a hard line break at the end of a word.
pub const END_OF_LINE: char = '\n';

/// Check if a character is a hyphen or one of its typographic variants.
pub fn is_hyphen(c: char) -> bool {
    matches!(
        c,
        '-' | '\u{00AD}' // soft hyphen
            | '\u{2010}'
            | '\u{2011}'
            | '\u{2012}'
            | '\u{2013}'
            | '\u{2212}'
            | '\u{FE63}'
            | '\u{FF0D}'
    )
}

/// Check if the last non-whitespace character of a word is a hyphen.
pub fn ends_with_hyphen(word: &str) -> bool {
    word.trim_end().chars().last().is_some_and(is_hyphen)
}

/// Drop trailing whitespace and then a trailing hyphen, if present.
pub(crate) fn strip_hyphen(word: &str) -> &str {
    let trimmed = word.trim_end();
    match trimmed.char_indices().last() {
        Some((i, c)) if is_hyphen(c) => &trimmed[..i],
        _ => trimmed,
    }
}
