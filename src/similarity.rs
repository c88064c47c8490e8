//! Text and geometry similarity measures.
//!
//! Both measures are symmetric and bounded to `[0, 1]`, where `1` means
//! identical.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::Point;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Split text into its normalized token set.
///
/// Text is NFKC-normalized and lowercased; tokens are maximal runs of letters
/// and digits, so punctuation and dashes never form tokens.
pub fn tokens(text: &str) -> HashSet<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    TOKEN_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard similarity of the token sets of two texts.
///
/// Two texts without any token are considered identical.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);

    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }

    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f64 / union as f64
}

/// Geometric similarity of two point sets.
///
/// Every point is matched with its nearest neighbour in the other set; the
/// mean nearest distance (averaged over both directions) is normalized by the
/// diagonal of the region spanned by both sets.
pub fn sim_bbox(a: &[Point], b: &[Point]) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let distance = (mean_nearest(a, b) + mean_nearest(b, a)) / 2.0;
    let diagonal = span_diagonal(a.iter().chain(b.iter()));

    if diagonal == 0.0 {
        // All points coincide.
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }

    (1.0 - distance / diagonal).clamp(0.0, 1.0)
}

fn mean_nearest(from: &[Point], to: &[Point]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|p| {
            to.iter()
                .map(|q| p.distance(q))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / from.len() as f64
}

fn span_diagonal<'a>(points: impl Iterator<Item = &'a Point>) -> f64 {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    (max_x - min_x).hypot(max_y - min_y)
}
