//! Dehyphenation of line breaks inside a paragraph.
//!
//! A line ending in a hyphen is ambiguous: the hyphen may split one word
//! ("auto-" + "mobile"), belong to a compound ("well-" + "known"), or stand
//! between two unrelated words. All ambiguous breaks of a paragraph are ranked
//! by the scorer in a single batch.

use super::{ends_with_hyphen, strip_hyphen, WordLine, END_OF_LINE};
use crate::cache::DecisionCache;
use crate::error::{Error, Result};
use crate::score::{argmin, score_batch, Scorer};

const NAMESPACE: &str = "dehyphen";

/// Ways to resolve one hyphenated line break, in candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Leave both lines untouched
    Keep,
    /// Join the words and keep the hyphen (compound word)
    KeepHyphen,
    /// Join the words and drop the hyphen
    DropHyphen,
}

impl Join {
    const ALL: [Join; 3] = [Join::Keep, Join::KeepHyphen, Join::DropHyphen];

    /// Candidate text for joining `last` and `next` this way.
    pub fn candidate(self, last: &str, next: &str) -> String {
        match self {
            Join::Keep => format!("{}{}", last, next),
            Join::KeepHyphen => format!("{}{}", last.trim_end(), next),
            Join::DropHyphen => format!("{}{}", strip_hyphen(last), next),
        }
    }
}

/// Check whether the break after `line` is a join candidate.
fn is_ambiguous_break(line: &WordLine, next: &WordLine) -> bool {
    let (Some(last), Some(_)) = (line.last(), next.first()) else {
        return false;
    };
    !last.ends_with(END_OF_LINE) && ends_with_hyphen(last)
}

/// Resolve hyphenated line breaks of one paragraph without caching.
///
/// Makes exactly one scorer call with three candidates per ambiguous break,
/// or none if there is no ambiguous break. Lines emptied by a join are
/// dropped from the result.
pub fn dehyphenate<S: Scorer + ?Sized>(scorer: &S, lines: &[WordLine]) -> Result<Vec<WordLine>> {
    let breaks: Vec<usize> = lines
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| is_ambiguous_break(&pair[0], &pair[1]))
        .map(|(i, _)| i)
        .collect();

    if breaks.is_empty() {
        return Ok(lines.to_vec());
    }

    let candidates: Vec<String> = breaks
        .iter()
        .flat_map(|&i| {
            let last = &lines[i][lines[i].len() - 1];
            let next = &lines[i + 1][0];
            Join::ALL.map(|join| join.candidate(last, next))
        })
        .collect();

    let scores = score_batch(scorer, &candidates)?;

    let mut out = lines.to_vec();
    for (n, &i) in breaks.iter().enumerate() {
        let options = &scores[n * Join::ALL.len()..(n + 1) * Join::ALL.len()];
        let join = argmin(options)
            .map(|best| Join::ALL[best])
            .ok_or(Error::ScoreCount {
                expected: candidates.len(),
                actual: scores.len(),
            })?;
        log::debug!("line break {}: {:?} {:?}", i, join, options);

        if join == Join::Keep {
            continue;
        }
        apply_join(&mut out, i, join);
    }

    out.retain(|line| !line.is_empty());
    Ok(out)
}

/// Move the last word of line `i` onto the first word of line `i + 1`.
///
/// The join is derived from the current words: when the last word was itself
/// produced by an earlier join it carries a leading space, which is dropped.
fn apply_join(lines: &mut [WordLine], i: usize, join: Join) {
    let Some(last) = lines[i].pop() else {
        return;
    };
    let joined = join.candidate(last.trim_start(), &lines[i + 1][0]);
    lines[i + 1][0] = format!(" {}", joined);
}

/// Memoizing line break resolver.
pub struct LineBreakResolver<'a> {
    scorer: &'a dyn Scorer,
    cache: &'a DecisionCache,
}

impl<'a> LineBreakResolver<'a> {
    /// Create a resolver.
    pub fn new(scorer: &'a dyn Scorer, cache: &'a DecisionCache) -> Self {
        Self { scorer, cache }
    }

    /// Resolve hyphenated line breaks, reusing the result for identical input.
    pub fn resolve(&self, lines: &[WordLine]) -> Result<Vec<WordLine>> {
        self.cache
            .get_or_compute(NAMESPACE, lines, || dehyphenate(self.scorer, lines))
    }
}
