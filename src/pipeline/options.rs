//! Reflow options and configuration.

use crate::cache::CacheOptions;
use crate::resolve::{SimilarityThresholds, TieBreak};

/// Options for reconstructing the text of a document.
#[derive(Debug, Clone)]
pub struct ReflowOptions {
    /// Tolerance over the median line spacing before two lines count as separated
    pub line_spacing_factor: f64,

    /// Thresholds for duplicate headers and footers
    pub similarity: SimilarityThresholds,

    /// Which duplicate instance survives
    pub tie_break: TieBreak,

    /// Rejoin words hyphenated at line ends
    pub dehyphenate: bool,

    /// Merge paragraphs split by page or column breaks
    pub merge_paragraphs: bool,

    /// Collapse repeated headers and footers
    pub remove_duplicates: bool,

    /// Decision cache configuration
    pub cache: CacheOptions,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            line_spacing_factor: 0.5,
            similarity: SimilarityThresholds::default(),
            tie_break: TieBreak::default(),
            dehyphenate: true,
            merge_paragraphs: true,
            remove_duplicates: true,
            cache: CacheOptions::default(),
        }
    }
}

impl ReflowOptions {
    /// Create new reflow options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line spacing tolerance.
    pub fn with_line_spacing_factor(mut self, factor: f64) -> Self {
        self.line_spacing_factor = factor;
        self
    }

    /// Set duplicate similarity thresholds.
    pub fn with_similarity(mut self, thresholds: SimilarityThresholds) -> Self {
        self.similarity = thresholds;
        self
    }

    /// Set the duplicate tie-break rule.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Enable or disable dehyphenation.
    pub fn with_dehyphenate(mut self, enabled: bool) -> Self {
        self.dehyphenate = enabled;
        self
    }

    /// Enable or disable paragraph merging.
    pub fn with_merge_paragraphs(mut self, enabled: bool) -> Self {
        self.merge_paragraphs = enabled;
        self
    }

    /// Enable or disable duplicate removal.
    pub fn with_remove_duplicates(mut self, enabled: bool) -> Self {
        self.remove_duplicates = enabled;
        self
    }

    /// Set the cache configuration.
    pub fn with_cache(mut self, cache: CacheOptions) -> Self {
        self.cache = cache;
        self
    }

    /// Keep decisions in memory only.
    pub fn in_memory(self) -> Self {
        self.with_cache(CacheOptions::memory())
    }
}
