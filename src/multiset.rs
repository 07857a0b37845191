//! MapMultiset: per-element occurrence counts over a hash map.
//!
//! Every stored count is at least 1; an element whose count would reach
//! zero is removed from the map. A running total of occurrences is kept
//! next to the map so `len` is O(1).

use crate::error::CollectionError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

pub struct MapMultiset<T, S = RandomState> {
    counts: HashMap<T, usize, S>,
    total: usize,
}

impl<T> MapMultiset<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<T> Default for MapMultiset<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> MapMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            counts: HashMap::with_hasher(hasher),
            total: 0,
        }
    }

    /// Total number of occurrences.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Number of distinct elements.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Occurrences of `item`; 0 when absent.
    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.counts.contains_key(item)
    }

    /// Add one occurrence of `item`.
    pub fn add(&mut self, item: T) -> &mut Self {
        self.add_positive(item, 1);
        self
    }

    /// Add `n` occurrences of `item`. `n` must be at least 1.
    pub fn add_many(&mut self, item: T, n: usize) -> Result<&mut Self, CollectionError> {
        if n == 0 {
            return Err(CollectionError::InvalidCount(n));
        }
        self.add_positive(item, n);
        Ok(self)
    }

    fn add_positive(&mut self, item: T, n: usize) {
        *self.counts.entry(item).or_insert(0) += n;
        self.total += n;
    }

    /// Remove one occurrence of `item`. Returns whether one was present.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_many(item, 1)
    }

    /// Remove up to `n` occurrences of `item`. Returns whether anything
    /// was removed.
    pub fn remove_many<Q>(&mut self, item: &Q, n: usize) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if n == 0 {
            return false;
        }
        let Some(count) = self.counts.get_mut(item) else {
            return false;
        };
        if *count > n {
            *count -= n;
            self.total -= n;
        } else {
            let gone = *count;
            self.counts.remove(item);
            self.total -= gone;
        }
        true
    }

    /// Set the number of occurrences of `item` to exactly `n`, which must
    /// be at least 1. On error the multiset is unchanged.
    pub fn set_count(&mut self, item: T, n: usize) -> Result<(), CollectionError> {
        if n == 0 {
            return Err(CollectionError::InvalidCount(n));
        }
        let old = self.counts.insert(item, n).unwrap_or(0);
        self.total = self.total - old + n;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

impl<T, S> MapMultiset<T, S> {
    /// Distinct elements, in unspecified order.
    pub fn elements(&self) -> hashbrown::hash_map::Keys<'_, T, usize> {
        self.counts.keys()
    }

    /// `(element, count)` pairs, in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(t, &n)| (t, n))
    }

    /// Every occurrence; an element with count `n` is yielded `n` times
    /// in a row.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.counts.iter(),
            current: None,
            remaining: self.total,
        }
    }
}

impl<T: Clone, S: Clone> Clone for MapMultiset<T, S> {
    fn clone(&self) -> Self {
        Self {
            counts: self.counts.clone(),
            total: self.total,
        }
    }
}

impl<T, S> PartialEq for MapMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total && self.counts == other.counts
    }
}

impl<T, S> Eq for MapMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T: fmt::Debug, S> fmt::Debug for MapMultiset<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts.iter()).finish()
    }
}

impl<T, S> Extend<T> for MapMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add_positive(item, 1);
        }
    }
}

impl<T, S> FromIterator<T> for MapMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<'a, T, S> IntoIterator for &'a MapMultiset<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over every occurrence of every element.
pub struct Iter<'a, T> {
    inner: hashbrown::hash_map::Iter<'a, T, usize>,
    current: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.current {
                Some((item, left)) if left > 0 => {
                    self.current = Some((item, left - 1));
                    self.remaining -= 1;
                    return Some(item);
                }
                _ => {
                    let (item, &n) = self.inner.next()?;
                    self.current = Some((item, n));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: `len` is the sum of all counts and never counts an
    /// element whose count dropped to zero.
    #[test]
    fn total_tracks_counts() {
        let mut m = MapMultiset::new();
        m.add("a").add("a").add("b");
        m.add_many("c", 3).unwrap();
        assert_eq!(m.len(), 6);
        assert_eq!(m.distinct_len(), 3);

        assert!(m.remove_many("c", 10));
        assert_eq!(m.len(), 3);
        assert!(!m.contains("c"));
        assert_eq!(m.entries().map(|(_, n)| n).sum::<usize>(), m.len());
    }

    /// Invariant: a rejected count leaves the multiset untouched.
    #[test]
    fn zero_counts_are_rejected() {
        let mut m = MapMultiset::new();
        m.add(7u32);
        assert_eq!(
            m.add_many(7, 0).err(),
            Some(CollectionError::InvalidCount(0))
        );
        assert_eq!(m.set_count(7, 0), Err(CollectionError::InvalidCount(0)));
        assert_eq!(m.count(&7), 1);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn set_count_replaces_and_adjusts_total() {
        let mut m = MapMultiset::new();
        m.add_many('x', 4).unwrap();
        m.set_count('x', 2).unwrap();
        m.set_count('y', 5).unwrap();
        assert_eq!(m.count(&'x'), 2);
        assert_eq!(m.len(), 7);
    }

    /// Invariant: `iter` yields each element exactly `count` times and
    /// reports an exact length.
    #[test]
    fn iter_repeats_by_count() {
        let m: MapMultiset<&str> = ["a", "b", "a", "a"].into_iter().collect();
        let it = m.iter();
        assert_eq!(it.len(), 4);
        let mut seen: Vec<&str> = it.copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "a", "a", "b"]);
    }

    #[test]
    fn borrowed_lookup_and_equality() {
        let mut a: MapMultiset<String> = MapMultiset::new();
        a.add("k".to_string()).add("k".to_string());
        assert_eq!(a.count("k"), 2);
        assert!(a.remove("k"));
        assert_eq!(a.count("k"), 1);

        let b: MapMultiset<String> = std::iter::once("k".to_string()).collect();
        assert_eq!(a, b);
        a.clear();
        assert!(a.is_empty());
        assert_ne!(a, b);
    }
}
