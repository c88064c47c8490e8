//! Merging of paragraphs split by a layout boundary.

use serde::{Deserialize, Serialize};

use super::{ends_with_hyphen, strip_hyphen, WordLine};
use crate::cache::DecisionCache;
use crate::error::{Error, Result};
use crate::score::{argmin, score_batch, Scorer};

const NAMESPACE: &str = "merge";

/// Ways to treat a pair of adjacent paragraphs, in candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeChoice {
    /// Two separate paragraphs
    Separate,
    /// One paragraph, joined with a space
    Merge,
    /// One paragraph, with the hyphenated boundary word rejoined
    MergeDehyphenated,
}

/// Scorer candidates for a paragraph pair, in [`MergeChoice`] order.
///
/// The dehyphenated candidate is only produced when the first paragraph
/// ends with a hyphen.
fn candidates(last: &WordLine, first: &WordLine) -> Vec<String> {
    let last_text = last.join(" ");
    let first_text = first.join(" ");

    let mut options = vec![
        format!("{}\n\n{}", last_text, first_text),
        last.iter().chain(first.iter()).cloned().collect::<Vec<_>>().join(" "),
    ];
    if last.last().is_some_and(|w| ends_with_hyphen(w)) {
        options.push(format!("{}{}", strip_hyphen(&last_text), first_text));
    }
    options
}

/// Decide whether two adjacent paragraphs are one, without caching.
///
/// Returns `None` to keep them apart, otherwise the merged paragraph. Empty
/// paragraphs are never merged and cost no scorer call.
pub fn merge_paragraphs<S: Scorer + ?Sized>(
    scorer: &S,
    para1: &[WordLine],
    para2: &[WordLine],
) -> Result<Option<Vec<WordLine>>> {
    let (Some(last), Some(first)) = (para1.last(), para2.first()) else {
        return Ok(None);
    };
    if last.is_empty() || first.is_empty() {
        return Ok(None);
    }

    let options = candidates(last, first);
    let scores = score_batch(scorer, &options)?;
    let choice = match argmin(&scores) {
        Some(0) => MergeChoice::Separate,
        Some(1) => MergeChoice::Merge,
        Some(2) => MergeChoice::MergeDehyphenated,
        _ => {
            return Err(Error::ScoreCount {
                expected: options.len(),
                actual: scores.len(),
            })
        }
    };
    log::debug!("paragraph boundary: {:?} {:?}", choice, scores);

    Ok(apply(choice, para1, para2))
}

fn apply(choice: MergeChoice, para1: &[WordLine], para2: &[WordLine]) -> Option<Vec<WordLine>> {
    let mut merged = para1.to_vec();
    let mut rest = para2.to_vec();
    let boundary = merged.last_mut()?.last_mut()?;

    match choice {
        MergeChoice::Separate => return None,
        MergeChoice::Merge => boundary.push(' '),
        MergeChoice::MergeDehyphenated => {
            let head = rest[0].remove(0);
            let stem = strip_hyphen(boundary).to_string();
            *boundary = format!("{}{} ", stem, head);
            if rest[0].is_empty() {
                rest.remove(0);
            }
        }
    }

    merged.extend(rest);
    Some(merged)
}

/// Memoizing paragraph merge resolver.
pub struct ParagraphMergeResolver<'a> {
    scorer: &'a dyn Scorer,
    cache: &'a DecisionCache,
}

impl<'a> ParagraphMergeResolver<'a> {
    /// Create a resolver.
    pub fn new(scorer: &'a dyn Scorer, cache: &'a DecisionCache) -> Self {
        Self { scorer, cache }
    }

    /// Decide whether two adjacent paragraphs are one, reusing earlier results.
    pub fn resolve(&self, para1: &[WordLine], para2: &[WordLine]) -> Result<Option<Vec<WordLine>>> {
        self.cache.get_or_compute(NAMESPACE, &(para1, para2), || {
            merge_paragraphs(self.scorer, para1, para2)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn para(raw: &[&[&str]]) -> Vec<WordLine> {
        raw.iter()
            .map(|l| l.iter().map(|w| w.to_string()).collect())
            .collect()
    }

    /// Picks candidate `winner`; counts calls and candidates.
    struct Pick {
        winner: usize,
        calls: AtomicUsize,
        seen: AtomicUsize,
    }

    impl Pick {
        fn new(winner: usize) -> Self {
            Self {
                winner,
                calls: AtomicUsize::new(0),
                seen: AtomicUsize::new(0),
            }
        }
    }

    impl Scorer for Pick {
        fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.fetch_add(candidates.len(), Ordering::SeqCst);
            Ok((0..candidates.len())
                .map(|i| if i == self.winner { 0.5 } else { 2.0 })
                .collect())
        }
    }

    #[test]
    fn test_candidates_without_hyphen() {
        let c = candidates(&vec!["ends".into(), "here".into()], &vec!["Next".into(), "one".into()]);
        assert_eq!(c, vec!["ends here\n\nNext one", "ends here Next one"]);
    }

    #[test]
    fn test_candidates_with_hyphen() {
        let c = candidates(&vec!["the".into(), "exam-".into()], &vec!["ple".into(), "is".into()]);
        assert_eq!(c.len(), 3);
        assert_eq!(c[2], "the example is");
    }

    #[test]
    fn test_keep_separate() {
        let scorer = Pick::new(0);
        let p1 = para(&[&["It", "was", "raining", "and"]]);
        let p2 = para(&[&["The", "next", "day"]]);
        assert_eq!(merge_paragraphs(&scorer, &p1, &p2).unwrap(), None);
        assert_eq!(scorer.seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_merge() {
        let scorer = Pick::new(1);
        let p1 = para(&[&["first", "line"], &["continues", "on"]]);
        let p2 = para(&[&["the", "next", "page"]]);
        let merged = merge_paragraphs(&scorer, &p1, &p2).unwrap().unwrap();
        assert_eq!(merged, para(&[&["first", "line"], &["continues", "on "], &["the", "next", "page"]]));
    }

    #[test]
    fn test_merge_dehyphenated() {
        let scorer = Pick::new(2);
        let p1 = para(&[&["a", "long", "exam-"]]);
        let p2 = para(&[&["ple"], &["goes", "on"]]);
        let merged = merge_paragraphs(&scorer, &p1, &p2).unwrap().unwrap();
        assert_eq!(merged, para(&[&["a", "long", "example "], &["goes", "on"]]));
        assert_eq!(scorer.seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_empty_paragraph_is_not_merged() {
        let scorer = Pick::new(1);
        assert_eq!(merge_paragraphs(&scorer, &[], &para(&[&["x"]])).unwrap(), None);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_resolver_memoizes_pair() {
        let scorer = Pick::new(1);
        let cache = DecisionCache::in_memory();
        let resolver = ParagraphMergeResolver::new(&scorer, &cache);
        let p1 = para(&[&["split", "in"]]);
        let p2 = para(&[&["two"]]);

        let first = resolver.resolve(&p1, &p2).unwrap();
        let second = resolver.resolve(&p1, &p2).unwrap();
        assert_eq!(first, second);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);

        // Order matters for the key.
        resolver.resolve(&p2, &p1).unwrap();
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 2);
    }
}
