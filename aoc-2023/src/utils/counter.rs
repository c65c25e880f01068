//! Occurrence counting

use indexmap::IndexMap;
use std::hash::Hash;

/// Counts occurrences of keys, remembering first-insertion order.
///
/// ```
/// use aoc_2023::utils::counter::Counter;
///
/// let cards: Counter<char> = "KTJJT".chars().collect();
/// assert_eq!(cards.get(&'J'), 2);
/// assert_eq!(cards.max(), Some((&'T', 2)));
/// assert_eq!(cards.counts_desc(), vec![2, 2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter<K: Hash + Eq> {
    counts: IndexMap<K, u64>,
}

impl<K: Hash + Eq> Counter<K> {
    pub fn new() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }

    /// Count one more `key`, returning its new count
    pub fn add(&mut self, key: K) -> u64 {
        self.add_count(key, 1)
    }

    pub fn add_count(&mut self, key: K, n: u64) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += n;
        *count
    }

    pub fn add_all(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            self.add(key);
        }
    }

    /// Count of `key`, zero if never seen
    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn remove(&mut self, key: &K) -> Option<u64> {
        self.counts.shift_remove(key)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Sum of the counts whose key passes `filter`
    pub fn total_by(&self, mut filter: impl FnMut(&K) -> bool) -> u64 {
        self.counts
            .iter()
            .filter(|(k, _)| filter(*k))
            .map(|(_, c)| c)
            .sum()
    }

    /// Most frequent key; ties go to the key seen first
    pub fn max(&self) -> Option<(&K, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&K, u64)>, (k, &c)| match best {
                Some((_, b)) if b >= c => best,
                _ => Some((k, c)),
            })
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counts.iter().map(|(k, &c)| (k, c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.counts.keys()
    }

    /// All counts, largest first
    pub fn counts_desc(&self) -> Vec<u64> {
        let mut counts: Vec<u64> = self.counts.values().copied().collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        counts
    }
}

impl<K: Hash + Eq> Default for Counter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> FromIterator<K> for Counter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Counter::new();
        counter.add_all(iter);
        counter
    }
}

impl<K: Hash + Eq> Extend<K> for Counter<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}
