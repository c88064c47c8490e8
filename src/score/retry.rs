//! Retrying scorer decorator with exponential backoff.
//!
//! Only transient scorer failures ([`Error::is_transient`]) are retried;
//! contract violations and rejected requests are returned immediately.

use std::thread;
use std::time::Duration;

use super::Scorer;
use crate::error::{Error, Result};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retries (exponential backoff).
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }
}

/// Result of evaluating whether to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after this delay.
    RetryAfter(Duration),
    /// Do not retry, the error is permanent.
    GiveUp,
    /// Maximum retries exhausted.
    Exhausted,
}

/// Decide whether to retry based on the error and attempt count.
pub fn should_retry(err: &Error, attempt: u32, config: &RetryConfig) -> RetryDecision {
    if !err.is_transient() {
        return RetryDecision::GiveUp;
    }
    if attempt >= config.max_retries {
        log::warn!("scorer retry limit exhausted after {} attempts", attempt);
        return RetryDecision::Exhausted;
    }
    let delay = compute_delay(attempt, config);
    log::debug!("scheduling scorer retry {} in {}ms", attempt + 1, delay.as_millis());
    RetryDecision::RetryAfter(delay)
}

/// delay = min(base * 2^attempt + jitter, max_delay), jitter in [0, base).
fn compute_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let base_ms = config.base_delay.as_millis() as u64;
    let exp_ms = base_ms.saturating_mul(1u64 << attempt.min(10));
    let total_ms = exp_ms.saturating_add(jitter(base_ms, attempt));
    Duration::from_millis(total_ms.min(config.max_delay.as_millis() as u64))
}

fn jitter(base_ms: u64, attempt: u32) -> u64 {
    let hash = (attempt as u64).wrapping_mul(6364136223846793005);
    hash % base_ms.max(1)
}

/// Scorer that retries transient failures of an inner scorer.
pub struct RetryingScorer<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: Scorer> RetryingScorer<S> {
    /// Wrap a scorer with the default retry configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, RetryConfig::default())
    }

    /// Wrap a scorer with a custom retry configuration.
    pub fn with_config(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The wrapped scorer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Scorer> Scorer for RetryingScorer<S> {
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
        let mut attempt = 0;
        loop {
            match self.inner.score_perplexity(candidates) {
                Ok(scores) => return Ok(scores),
                Err(err) => match should_retry(&err, attempt, &self.config) {
                    RetryDecision::RetryAfter(delay) => {
                        log::warn!("scorer failed ({}), retrying", err);
                        thread::sleep(delay);
                        attempt += 1;
                    }
                    RetryDecision::GiveUp | RetryDecision::Exhausted => return Err(err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::FnScorer;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(2))
            .with_max_retries(3)
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::default();
        assert!(compute_delay(0, &config) < Duration::from_secs(1));
        assert_eq!(compute_delay(20, &config), config.max_delay);
    }

    #[test]
    fn test_permanent_error_gives_up() {
        let decision = should_retry(&Error::Scorer("bad input".into()), 0, &fast());
        assert_eq!(decision, RetryDecision::GiveUp);
        let decision = should_retry(&Error::ScoreCount { expected: 1, actual: 0 }, 0, &fast());
        assert_eq!(decision, RetryDecision::GiveUp);
    }

    #[test]
    fn test_transient_error_is_retried() {
        let calls = AtomicU32::new(0);
        let flaky = FnScorer::new(|texts: &[String]| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::ScorerUnavailable("503".into()))
            } else {
                Ok(vec![1.0; texts.len()])
            }
        });
        let scorer = RetryingScorer::with_config(&flaky, fast());
        let scores = scorer.score_perplexity(&["a".to_string()]).unwrap();
        assert_eq!(scores, vec![1.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retries_exhausted() {
        let calls = AtomicU32::new(0);
        let down = FnScorer::new(|_: &[String]| -> Result<Vec<f64>> {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::ScorerUnavailable("down".into()))
        });
        let scorer = RetryingScorer::with_config(&down, fast());
        assert!(scorer.score_perplexity(&["a".to_string()]).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
