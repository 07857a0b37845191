//! Read-only collections.
//!
//! None of these types has a mutating method, so they cannot be changed
//! once built. `ImmutableBiMap` owns its storage directly, without the
//! shared handle of `HashBiMap`, and hands out plain references.

use crate::error::CollectionError;
use crate::hash_bimap::HashBiMap;
use crate::multimap::ArrayMultimap;
use crate::multiset::MapMultiset;
use crate::raw_bimap::RawBiMap;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

pub use crate::raw_bimap::{Iter, Keys, Values};

/// A bidirectional map fixed at construction. Iteration follows the
/// order in which pairs were supplied.
pub struct ImmutableBiMap<K, V, S = RandomState> {
    raw: RawBiMap<K, V, S>,
}

impl<K, V> ImmutableBiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    /// Build from `(key, value)` pairs. A pair that repeats an earlier one
    /// exactly is ignored; any other repeated key or value is an error.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with_hasher(pairs, RandomState::new())
    }
}

impl<K, V, S> ImmutableBiMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn from_pairs_with_hasher<I>(pairs: I, hasher: S) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let expected = pairs.size_hint().0;
        let mut raw = RawBiMap::with_expected_size_and_hasher(expected, hasher);
        for (k, v) in pairs {
            if let Err(rejected) = raw.put(k, v, false) {
                return Err(rejected.error);
            }
        }
        Ok(Self { raw })
    }

    /// Snapshot of `map`'s current contents and order.
    pub fn copy_of(map: &HashBiMap<K, V, S>) -> Self
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        Self {
            raw: map.snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get(key)
    }

    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get_by_value(value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.contains_key(key)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.contains_value(value)
    }
}

impl<K, V, S> ImmutableBiMap<K, V, S> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.raw.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.raw.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.raw.values()
    }

    /// Borrowed view with keys and values swapped.
    pub fn inverse(&self) -> ImmutableInverse<'_, K, V, S> {
        ImmutableInverse { map: self }
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for ImmutableBiMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ImmutableBiMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, f)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ImmutableBiMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An [`ImmutableBiMap`] seen from the value side.
pub struct ImmutableInverse<'a, K, V, S = RandomState> {
    map: &'a ImmutableBiMap<K, V, S>,
}

impl<'a, K, V, S> ImmutableInverse<'a, K, V, S> {
    /// The map this view was taken from.
    pub fn inverse(&self) -> &'a ImmutableBiMap<K, V, S> {
        self.map
    }

    /// `(value, key)` pairs in the map's order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a V, &'a K)> + 'a {
        self.map.raw.iter().map(|(k, v)| (v, k))
    }
}

impl<'a, K, V, S> ImmutableInverse<'a, K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&'a K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_by_value(value)
    }

    pub fn contains_key<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_value(value)
    }

    pub fn contains_value<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }
}

impl<K, V, S> Clone for ImmutableInverse<'_, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, S> Copy for ImmutableInverse<'_, K, V, S> {}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ImmutableInverse<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// A frozen [`ArrayMultimap`].
pub struct ImmutableMultimap<K, V, S = RandomState> {
    inner: ArrayMultimap<K, V, S>,
}

impl<K, V, S> From<ArrayMultimap<K, V, S>> for ImmutableMultimap<K, V, S> {
    fn from(inner: ArrayMultimap<K, V, S>) -> Self {
        Self { inner }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ImmutableMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<K, V, S> ImmutableMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn total_len(&self) -> usize {
        self.inner.total_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.contains_key(key)
    }

    pub fn contains_entry<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.inner.contains_entry(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.get(key)
    }
}

impl<K, V, S> ImmutableMultimap<K, V, S> {
    pub fn keys(&self) -> hashbrown::hash_map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.inner.iter()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.inner.pairs()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.inner.values()
    }

    pub fn as_map(&self) -> &hashbrown::HashMap<K, Vec<V>, S> {
        self.inner.as_map()
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for ImmutableMultimap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ImmutableMultimap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

/// A frozen [`MapMultiset`].
pub struct ImmutableMultiset<T, S = RandomState> {
    inner: MapMultiset<T, S>,
}

impl<T, S> From<MapMultiset<T, S>> for ImmutableMultiset<T, S> {
    fn from(inner: MapMultiset<T, S>) -> Self {
        Self { inner }
    }
}

impl<T, S> FromIterator<T> for ImmutableMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T, S> ImmutableMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn distinct_len(&self) -> usize {
        self.inner.distinct_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.count(item)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.contains(item)
    }
}

impl<T, S> ImmutableMultiset<T, S> {
    pub fn elements(&self) -> hashbrown::hash_map::Keys<'_, T, usize> {
        self.inner.elements()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.inner.entries()
    }

    pub fn iter(&self) -> crate::multiset::Iter<'_, T> {
        self.inner.iter()
    }
}

impl<T: Clone, S: Clone> Clone for ImmutableMultiset<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, S> PartialEq for ImmutableMultiset<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ImmutableMultiset<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<'a, T, S> IntoIterator for &'a ImmutableMultiset<T, S> {
    type Item = &'a T;
    type IntoIter = crate::multiset::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
