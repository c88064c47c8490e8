//! Removal of repeated boilerplate (running headers and footers).

use crate::cache::DecisionCache;
use crate::error::Result;
use crate::model::{Element, Point};
use crate::score::Scorer;
use crate::similarity::{jaccard, sim_bbox};

const NAMESPACE: &str = "fluency";

/// Thresholds two groups must both reach to count as duplicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityThresholds {
    /// Minimum Jaccard similarity of the group texts
    pub text: f64,
    /// Minimum geometric similarity of the group boxes
    pub geometry: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            text: 0.8,
            geometry: 0.6,
        }
    }
}

/// Which instance of a duplicate pair survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Keep the instance with the better (lower) fluency score; the later
    /// instance wins unless the earlier one scores strictly better
    #[default]
    Fluency,
    /// Always keep the earliest instance
    KeepFirst,
    /// Always keep the latest instance
    KeepLast,
}

/// Word texts of a group of elements, space-joined.
pub fn group_text(elements: &[Element]) -> String {
    elements
        .iter()
        .flat_map(|e| e.words())
        .map(|w| w.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The four corners of every element box in a group.
pub fn group_points(elements: &[Element]) -> Vec<Point> {
    elements.iter().flat_map(|e| e.bbox().corners()).collect()
}

/// Check if two groups match both by text and by position.
///
/// Either measure alone produces false positives: short texts coincide, and
/// unrelated elements share positions.
pub fn super_similar(a: &[Element], b: &[Element], thresholds: SimilarityThresholds) -> bool {
    let text_sim = jaccard(&group_text(a), &group_text(b));
    let box_sim = sim_bbox(&group_points(a), &group_points(b));
    log::debug!("footer/header sims {} {}", text_sim, box_sim);
    text_sim >= thresholds.text && box_sim >= thresholds.geometry
}

/// Collapses runs of repeated element groups across pages.
pub struct DuplicateFilter<'a> {
    scorer: &'a dyn Scorer,
    cache: &'a DecisionCache,
    thresholds: SimilarityThresholds,
    tie_break: TieBreak,
}

impl<'a> DuplicateFilter<'a> {
    /// Create a filter with default thresholds and fluency tie-break.
    pub fn new(scorer: &'a dyn Scorer, cache: &'a DecisionCache) -> Self {
        Self {
            scorer,
            cache,
            thresholds: SimilarityThresholds::default(),
            tie_break: TieBreak::default(),
        }
    }

    /// Set similarity thresholds.
    pub fn with_thresholds(mut self, thresholds: SimilarityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the tie-break rule.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Remove duplicate groups, one group per page.
    ///
    /// The result has one slot per input page. Of each run of duplicates
    /// exactly one group survives; the other slots are emptied.
    pub fn filter(&self, pages: Vec<Vec<Element>>) -> Result<Vec<Vec<Element>>> {
        let mut results: Vec<Vec<Element>> = Vec::with_capacity(pages.len());

        for group in pages {
            let mut keep = true;
            for accepted in results.iter_mut() {
                if accepted.is_empty() || !super_similar(accepted, &group, self.thresholds) {
                    continue;
                }
                if self.prefer_accepted(accepted, &group)? {
                    log::debug!("skipping duplicate group, the accepted one is better");
                    keep = false;
                    break;
                }
                log::debug!("replacing accepted duplicate group with a better one");
                accepted.clear();
            }
            results.push(if keep { group } else { Vec::new() });
        }

        Ok(results)
    }

    fn prefer_accepted(&self, accepted: &[Element], candidate: &[Element]) -> Result<bool> {
        match self.tie_break {
            TieBreak::KeepFirst => Ok(true),
            TieBreak::KeepLast => Ok(false),
            TieBreak::Fluency => {
                Ok(self.fluency(&group_text(accepted))? < self.fluency(&group_text(candidate))?)
            }
        }
    }

    fn fluency(&self, text: &str) -> Result<f64> {
        self.cache
            .get_or_compute(NAMESPACE, text, || self.scorer.single_score(text))
    }
}
