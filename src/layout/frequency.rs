//! Frequency counting over multisets.

use std::hash::Hash;

use indexmap::IndexMap;

/// Occurrence counts of values, remembering first-seen order.
#[derive(Debug, Clone)]
pub struct Frequency<K> {
    counts: IndexMap<K, usize>,
    total: usize,
}

impl<K: Hash + Eq> Default for Frequency<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
            total: 0,
        }
    }
}

impl<K: Hash + Eq> Frequency<K> {
    /// Create an empty frequency map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `value`.
    pub fn add(&mut self, value: K) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    /// Record every value of an iterator.
    pub fn extend(&mut self, values: impl IntoIterator<Item = K>) {
        for v in values {
            self.add(v);
        }
    }

    /// Number of recorded occurrences of `value`.
    pub fn count(&self, value: &K) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Total number of recorded occurrences.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The most frequent value; ties go to the value seen first.
    pub fn most_common(&self) -> Option<&K> {
        let mut best: Option<(&K, usize)> = None;
        for (k, &c) in &self.counts {
            if best.map_or(true, |(_, bc)| c > bc) {
                best = Some((k, c));
            }
        }
        best.map(|(k, _)| k)
    }

    /// The `n` most frequent values with their counts, most frequent first.
    pub fn top(&self, n: usize) -> Vec<(&K, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, &c)| (k, c)).collect();
        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl<K: Hash + Eq + Ord + Copy + Into<f64>> Frequency<K> {
    /// Weighted median of the recorded values.
    ///
    /// For an even number of occurrences the two middle values are averaged.
    pub fn median(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }

        let mut values: Vec<(K, usize)> = self.counts.iter().map(|(&k, &c)| (k, c)).collect();
        values.sort_by(|a, b| a.0.cmp(&b.0));

        let lower_rank = (self.total - 1) / 2;
        let upper_rank = self.total / 2;
        let lower = value_at_rank(&values, lower_rank)?;
        let upper = value_at_rank(&values, upper_rank)?;
        Some((lower.into() + upper.into()) / 2.0)
    }
}

fn value_at_rank<K: Copy>(sorted: &[(K, usize)], rank: usize) -> Option<K> {
    let mut seen = 0;
    for &(value, count) in sorted {
        seen += count;
        if rank < seen {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_common_prefers_first_seen() {
        let mut f = Frequency::new();
        f.extend(["b", "a", "a", "b", "c"]);
        assert_eq!(f.most_common(), Some(&"b"));
        assert_eq!(f.total(), 5);
        assert_eq!(f.distinct(), 3);
        assert_eq!(f.count(&"a"), 2);
    }

    #[test]
    fn test_top() {
        let mut f = Frequency::new();
        f.extend([3u32, 1, 1, 2, 1, 2]);
        assert_eq!(f.top(2), vec![(&1, 3), (&2, 2)]);
    }

    #[test]
    fn test_median_odd_and_even() {
        let mut odd = Frequency::new();
        odd.extend([10u32, 30, 20]);
        assert_eq!(odd.median(), Some(20.0));

        let mut even = Frequency::new();
        even.extend([10u32, 20, 30, 40]);
        assert_eq!(even.median(), Some(25.0));
    }

    #[test]
    fn test_median_resists_outliers() {
        let mut f = Frequency::new();
        f.extend([12u32, 12, 12, 13, 11, 400]);
        assert_eq!(f.median(), Some(12.0));
    }

    #[test]
    fn test_median_empty() {
        let f: Frequency<u32> = Frequency::new();
        assert_eq!(f.median(), None);
        assert!(f.most_common().is_none());
    }
}
