//! Shared test fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use unocr::error::Result;
use unocr::model::{BBox, Block, Element, Line, Properties, Word};
use unocr::score::Scorer;

/// Deterministic scorer: a lookup table with a default score.
///
/// Every batch it receives is recorded.
pub struct FakeScorer {
    table: HashMap<String, f64>,
    default: f64,
    batches: Mutex<Vec<Vec<String>>>,
}

impl FakeScorer {
    pub fn new(default: f64) -> Self {
        Self {
            table: HashMap::new(),
            default,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, text: &str, score: f64) -> Self {
        self.table.insert(text.to_string(), score);
        self
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl Scorer for FakeScorer {
    fn score_perplexity(&self, candidates: &[String]) -> Result<Vec<f64>> {
        self.batches.lock().unwrap().push(candidates.to_vec());
        Ok(candidates
            .iter()
            .map(|c| self.table.get(c).copied().unwrap_or(self.default))
            .collect())
    }
}

/// Route library logs to the test output; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn word_lines(raw: &[&[&str]]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|l| l.iter().map(|w| w.to_string()).collect())
        .collect()
}

/// A one-line header paragraph group.
pub fn header_group(id: u64, text: &str, bbox: BBox) -> Vec<Element> {
    let words = text
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| Word::new(id * 100 + i as u64, bbox, "font_0", w))
        .collect();
    let line = Line::new(id * 100 + 99, bbox, words);
    vec![Element::Paragraph(
        Block::new(id, bbox, vec![line]).with_properties(Properties::header()),
    )]
}
