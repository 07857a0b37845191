//! Multimaps: keys mapped to collections of values.
//!
//! A key is present exactly while at least one value is stored under it;
//! removing the last value removes the key. `get` on an absent key returns
//! `None`, never an empty collection. Key iteration order is unspecified.

use crate::multiset::MapMultiset;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

/// Operations shared by the multimap flavours.
pub trait Multimap<K, V> {
    /// The per-key value collection.
    type Values: ?Sized;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    /// Number of key/value pairs, counting repeats.
    fn total_len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool;

    fn get(&self, key: &K) -> Option<&Self::Values>;

    fn put(&mut self, key: K, value: V) -> &mut Self;

    /// Remove one occurrence of `value` under `key`.
    fn remove(&mut self, key: &K, value: &V) -> bool;

    /// Remove `key` with all its values; returns how many values went.
    fn remove_all(&mut self, key: &K) -> usize;

    fn clear(&mut self);
}

/// Multimap keeping each key's values in a `Vec`, in insertion order.
/// Duplicate values under one key are kept.
pub struct ArrayMultimap<K, V, S = RandomState> {
    map: HashMap<K, Vec<V>, S>,
    total: usize,
}

impl<K, V> ArrayMultimap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V> Default for ArrayMultimap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ArrayMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn total_len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub fn contains_entry<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        self.map.get(key).is_some_and(|vs| vs.contains(value))
    }

    /// The values under `key`, oldest first.
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).map(Vec::as_slice)
    }

    /// Append `value` to the values under `key`.
    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        self.map.entry(key).or_default().push(value);
        self.total += 1;
        self
    }

    /// Remove the first occurrence of `value` under `key`.
    pub fn remove<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            self.map.remove(key);
        }
        self.total -= 1;
        true
    }

    pub fn remove_all<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let values = self.map.remove(key)?;
        self.total -= values.len();
        Some(values)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.total = 0;
    }
}

impl<K, V, S> ArrayMultimap<K, V, S> {
    pub fn keys(&self) -> hashbrown::hash_map::Keys<'_, K, Vec<V>> {
        self.map.keys()
    }

    /// `(key, values)` for every key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.map.iter().map(|(k, vs)| (k, vs.as_slice()))
    }

    /// Every key/value pair; a key appears once per value.
    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
    }

    /// Every value under every key.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }

    pub fn as_map(&self) -> &HashMap<K, Vec<V>, S> {
        &self.map
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for ArrayMultimap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            total: self.total,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ArrayMultimap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ArrayMultimap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total && self.map == other.map
    }
}

impl<K, V, S> Extend<(K, V)> for ArrayMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ArrayMultimap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> Multimap<K, V> for ArrayMultimap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    type Values = [V];

    fn len(&self) -> usize {
        ArrayMultimap::len(self)
    }
    fn total_len(&self) -> usize {
        ArrayMultimap::total_len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        ArrayMultimap::contains_key(self, key)
    }
    fn get(&self, key: &K) -> Option<&[V]> {
        ArrayMultimap::get(self, key)
    }
    fn put(&mut self, key: K, value: V) -> &mut Self {
        ArrayMultimap::put(self, key, value)
    }
    fn remove(&mut self, key: &K, value: &V) -> bool {
        ArrayMultimap::remove(self, key, value)
    }
    fn remove_all(&mut self, key: &K) -> usize {
        ArrayMultimap::remove_all(self, key).map_or(0, |vs| vs.len())
    }
    fn clear(&mut self) {
        ArrayMultimap::clear(self)
    }
}

/// Multimap storing each key's values as a [`MapMultiset`]: values are
/// counted rather than listed, and their order is unspecified.
pub struct MultisetMultimap<K, V, S = RandomState> {
    map: HashMap<K, MapMultiset<V, S>, S>,
    total: usize,
}

impl<K, V> MultisetMultimap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V> Default for MultisetMultimap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> MultisetMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    /// `hasher` is also used by every per-key multiset.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn total_len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub fn contains_entry<Q, R>(&self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Borrow<R>,
        R: ?Sized + Hash + Eq,
    {
        self.map.get(key).is_some_and(|vs| vs.contains(value))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&MapMultiset<V, S>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    /// Add one occurrence of `value` under `key`.
    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        let hasher = self.map.hasher().clone();
        self.map
            .entry(key)
            .or_insert_with(|| MapMultiset::with_hasher(hasher))
            .add(value);
        self.total += 1;
        self
    }

    /// Remove one occurrence of `value` under `key`.
    pub fn remove<Q, R>(&mut self, key: &Q, value: &R) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Borrow<R>,
        R: ?Sized + Hash + Eq,
    {
        let Some(values) = self.map.get_mut(key) else {
            return false;
        };
        if !values.remove(value) {
            return false;
        }
        if values.is_empty() {
            self.map.remove(key);
        }
        self.total -= 1;
        true
    }

    pub fn remove_all<Q>(&mut self, key: &Q) -> Option<MapMultiset<V, S>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let values = self.map.remove(key)?;
        self.total -= values.len();
        Some(values)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.total = 0;
    }
}

impl<K, V, S> MultisetMultimap<K, V, S> {
    pub fn keys(&self) -> hashbrown::hash_map::Keys<'_, K, MapMultiset<V, S>> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &MapMultiset<V, S>)> + '_ {
        self.map.iter()
    }

    /// Every key/value pair; a value with count `n` appears `n` times.
    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.map.values().flatten()
    }

    pub fn as_map(&self) -> &HashMap<K, MapMultiset<V, S>, S> {
        &self.map
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for MultisetMultimap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            total: self.total,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for MultisetMultimap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for MultisetMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for MultisetMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> Multimap<K, V> for MultisetMultimap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Clone,
{
    type Values = MapMultiset<V, S>;

    fn len(&self) -> usize {
        MultisetMultimap::len(self)
    }
    fn total_len(&self) -> usize {
        MultisetMultimap::total_len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        MultisetMultimap::contains_key(self, key)
    }
    fn get(&self, key: &K) -> Option<&MapMultiset<V, S>> {
        MultisetMultimap::get(self, key)
    }
    fn put(&mut self, key: K, value: V) -> &mut Self {
        MultisetMultimap::put(self, key, value)
    }
    fn remove(&mut self, key: &K, value: &V) -> bool {
        MultisetMultimap::remove(self, key, value)
    }
    fn remove_all(&mut self, key: &K) -> usize {
        MultisetMultimap::remove_all(self, key).map_or(0, |vs| vs.len())
    }
    fn clear(&mut self) {
        MultisetMultimap::clear(self)
    }
}
