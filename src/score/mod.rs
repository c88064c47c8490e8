//! Fluency scoring interface.
//!
//! The resolvers rank text candidates with an external language-model
//! scorer. Scores are perplexity-like: lower means more plausible text.
//! Implementations are expected to be deterministic for a given input.
//!
//! # Example
//!
//! ```
//! use unocr::score::{FnScorer, Scorer};
//!
//! // Prefer shorter strings.
//! let scorer = FnScorer::new(|texts: &[String]| {
//!     Ok(texts.iter().map(|t| t.len() as f64).collect())
//! });
//! assert_eq!(scorer.single_score("abc").unwrap(), 3.0);
//! ```

mod retry;

pub use retry::{RetryConfig, RetryDecision, RetryingScorer};

use crate::error::{Error, Result};

/// A batched text fluency scorer.
pub trait Scorer: Send + Sync {
    /// Score every candidate, returning one score per candidate in input order.
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>>;

    /// Score a single text.
    fn single_score(&self, text: &str) -> Result<f64> {
        let scores = score_batch(self, &[text.to_string()])?;
        Ok(scores[0])
    }
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
        (**self).score_perplexity(candidates)
    }

    fn single_score(&self, text: &str) -> Result<f64> {
        (**self).single_score(text)
    }
}

impl<S: Scorer + ?Sized> Scorer for std::sync::Arc<S> {
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
        (**self).score_perplexity(candidates)
    }

    fn single_score(&self, text: &str) -> Result<f64> {
        (**self).single_score(text)
    }
}

/// Scorer backed by a closure.
pub struct FnScorer<F> {
    func: F,
}

impl<F> FnScorer<F>
where
    F: Fn(&[String]) -> Result<Vec<f64>> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Scorer for FnScorer<F>
where
    F: Fn(&[String]) -> Result<Vec<f64>> + Send + Sync,
{
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
        (self.func)(candidates)
    }
}

/// Score a batch and check the scorer kept its contract.
///
/// An empty batch makes no call. The scorer must return exactly one finite
/// score per candidate; anything else is an error.
pub fn score_batch<S: Scorer + ?Sized>(scorer: &S, candidates: &[String]) -> Result<Vec<f64>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let scores = scorer.score_perplexity(candidates)?;
    if scores.len() != candidates.len() {
        return Err(Error::ScoreCount {
            expected: candidates.len(),
            actual: scores.len(),
        });
    }
    if let Some((index, &score)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(Error::InvalidScore { index, score });
    }

    log::debug!("scored {} candidates: {:?}", candidates.len(), scores);
    Ok(scores)
}

/// Index of the lowest score; ties go to the lowest index.
pub fn argmin(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if best.map_or(true, |(_, b)| s < b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(scores: Vec<f64>) -> impl Scorer {
        FnScorer::new(move |_: &[String]| Ok(scores.clone()))
    }

    fn candidates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn test_argmin_is_stable() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0]), Some(1));
        assert_eq!(argmin(&[2.0, 2.0, 2.0]), Some(0));
        assert_eq!(argmin(&[5.0, 4.0, 3.0]), Some(2));
        assert_eq!(argmin(&[]), None);
    }

    #[test]
    fn test_score_batch_count_mismatch() {
        let scorer = fixed(vec![1.0, 2.0]);
        let err = score_batch(&scorer, &candidates(3)).unwrap_err();
        assert!(matches!(err, Error::ScoreCount { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_score_batch_rejects_nan() {
        let scorer = fixed(vec![1.0, f64::NAN]);
        let err = score_batch(&scorer, &candidates(2)).unwrap_err();
        assert!(matches!(err, Error::InvalidScore { index: 1, .. }));
    }

    #[test]
    fn test_score_batch_empty_makes_no_call() {
        let scorer = FnScorer::new(|_: &[String]| -> Result<Vec<f64>> {
            Err(Error::Scorer("must not be called".into()))
        });
        assert!(score_batch(&scorer, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_score_default() {
        let scorer = FnScorer::new(|texts: &[String]| Ok(texts.iter().map(|t| t.len() as f64).collect()));
        assert_eq!(scorer.single_score("four").unwrap(), 4.0);
    }
}
