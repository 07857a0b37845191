use crate::bimap::BiMap;
use crate::error::CollectionError;
use crate::inverse::Inverse;
use crate::raw_bimap::{EntryKey, RawBiMap};
use core::cell::{Ref, RefCell};
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Shared state behind a `HashBiMap` and every `Inverse` taken from it.
pub(crate) type Shared<K, V, S> = Rc<RefCell<RawBiMap<K, V, S>>>;

/// A bidirectional hash map: keys map to unique values and values map back
/// to unique keys. Iteration follows insertion order.
///
/// `HashBiMap` is a handle. `Clone` produces another handle to the same
/// map; use [`HashBiMap::deep_clone`] for an independent copy. The view
/// returned by [`HashBiMap::inverse`] shares the same state, so a change
/// made through either side is visible through the other.
pub struct HashBiMap<K, V, S = RandomState> {
    inner: Shared<K, V, S>,
}

impl<K, V> HashBiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::from_raw(RawBiMap::new())
    }

    /// Size the tables for `expected_size` entries up front.
    pub fn with_expected_size(expected_size: usize) -> Self {
        Self::from_raw(RawBiMap::with_expected_size(expected_size))
    }
}

impl<K, V> Default for HashBiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashBiMap<K, V, S> {
    pub(crate) fn from_raw(raw: RawBiMap<K, V, S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(raw)),
        }
    }

    pub(crate) fn from_shared(inner: Shared<K, V, S>) -> Self {
        Self { inner }
    }

    /// True if both handles refer to the same underlying map.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// A live view with keys and values swapped. Cheap: every call returns
    /// a new handle onto the same state.
    pub fn inverse(&self) -> Inverse<K, V, S> {
        Inverse::from_shared(Rc::clone(&self.inner))
    }

    /// Entries as owned `(K, V)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            cursor: Cursor::new(&self.inner),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys {
            cursor: Cursor::new(&self.inner),
        }
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values {
            cursor: Cursor::new(&self.inner),
        }
    }
}

impl<K, V, S> HashBiMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_raw(RawBiMap::with_hasher(hasher))
    }

    pub fn with_expected_size_and_hasher(expected_size: usize, hasher: S) -> Self {
        Self::from_raw(RawBiMap::with_expected_size_and_hasher(
            expected_size,
            hasher,
        ))
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Current number of buckets in each hash table.
    pub fn capacity(&self) -> usize {
        self.inner.borrow().capacity()
    }

    /// Number of structural changes made so far. Two equal readings mean
    /// nothing was inserted or removed in between.
    pub fn modification_count(&self) -> u64 {
        self.inner.borrow().modification_count()
    }

    /// The value mapped from `key`. The map cannot be modified while the
    /// returned `Ref` is alive.
    pub fn get<Q>(&self, key: &Q) -> Option<Ref<'_, V>>
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ref::filter_map(self.inner.borrow(), |m| m.get(key)).ok()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.borrow().contains_key(key)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.borrow().contains_value(value)
    }

    /// Map `key` to `value`.
    ///
    /// Fails with `KeyConflict` if `key` is already mapped to another
    /// value, or `ValueConflict` if `value` is already mapped from another
    /// key. A failed call leaves the map unchanged. Setting a mapping that
    /// is already present is a no-op.
    pub fn set(&self, key: K, value: V) -> Result<&Self, CollectionError> {
        let res = self.inner.borrow_mut().put(key, value, false);
        // The borrow is released; any pair handed back drops here.
        match res {
            Ok(_) => Ok(self),
            Err(rejected) => Err(rejected.error),
        }
    }

    /// Map `key` to `value`, removing whatever mapping previously held
    /// either of them. A replaced key keeps its position in iteration
    /// order.
    pub fn force_set(&self, key: K, value: V) -> &Self {
        let displaced = self.inner.borrow_mut().put(key, value, true);
        debug_assert!(displaced.is_ok(), "forced put cannot be rejected");
        drop(displaced);
        self
    }

    /// Remove the mapping for `key`. Returns whether one existed.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).is_some()
    }

    pub fn remove_entry<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.borrow_mut().remove_by_key(key)
    }

    /// Remove every mapping. Table capacity is kept.
    pub fn clear(&self) {
        let drained = self.inner.borrow_mut().clear();
        drop(drained);
    }

    /// Clone of the value mapped from `key`.
    pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.get(key).map(|v| (*v).clone())
    }
}

impl<K, V, S> HashBiMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// An independent map with the same mappings, order and hasher.
    pub fn deep_clone(&self) -> Self {
        Self::from_raw(self.snapshot())
    }

    pub(crate) fn snapshot(&self) -> RawBiMap<K, V, S> {
        self.inner.borrow().clone()
    }
}

impl<K, V, S> Clone for HashBiMap<K, V, S> {
    /// Another handle to the same map.
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashBiMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(m) => fmt::Debug::fmt(&*m, f),
            Err(_) => f.write_str("HashBiMap { <borrowed> }"),
        }
    }
}

impl<'a, K: Clone, V: Clone, S> IntoIterator for &'a HashBiMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V, S>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> BiMap<K, V> for HashBiMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Inverse = Inverse<K, V, S>;

    fn len(&self) -> usize {
        HashBiMap::len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        HashBiMap::contains_key(self, key)
    }
    fn contains_value(&self, value: &V) -> bool {
        HashBiMap::contains_value(self, value)
    }
    fn get_cloned(&self, key: &K) -> Option<V> {
        HashBiMap::get_cloned(self, key)
    }
    fn set(&self, key: K, value: V) -> Result<&Self, CollectionError> {
        HashBiMap::set(self, key, value)
    }
    fn force_set(&self, key: K, value: V) -> &Self {
        HashBiMap::force_set(self, key, value)
    }
    fn remove(&self, key: &K) -> bool {
        HashBiMap::remove(self, key)
    }
    fn clear(&self) {
        HashBiMap::clear(self)
    }
    fn inverse(&self) -> Self::Inverse {
        HashBiMap::inverse(self)
    }
}

/// Position in the insertion-order list of a shared map.
///
/// No borrow of the map is held between steps: each step borrows, reads
/// the entry the cursor names and the link to the next one, and releases.
/// If that entry has been removed in the meantime the traversal ends.
pub(crate) struct Cursor<'a, K, V, S> {
    map: &'a RefCell<RawBiMap<K, V, S>>,
    next: Option<EntryKey>,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub(crate) fn new(map: &'a RefCell<RawBiMap<K, V, S>>) -> Self {
        let next = map.borrow().head();
        Self { map, next }
    }

    pub(crate) fn advance<T>(&mut self, project: impl FnOnce(&K, &V) -> T) -> Option<T> {
        let at = self.next.take()?;
        let map = self.map.borrow();
        let (k, v, next) = map.at(at)?;
        self.next = next;
        Some(project(k, v))
    }
}

/// Iterator over owned `(K, V)` pairs in insertion order.
pub struct Iter<'a, K, V, S = RandomState> {
    cursor: Cursor<'a, K, V, S>,
}

impl<K: Clone, V: Clone, S> Iterator for Iter<'_, K, V, S> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(|k, v| (k.clone(), v.clone()))
    }
}

impl<K: Clone, V: Clone, S> FusedIterator for Iter<'_, K, V, S> {}

/// Iterator over owned keys in insertion order.
pub struct Keys<'a, K, V, S = RandomState> {
    pub(crate) cursor: Cursor<'a, K, V, S>,
}

impl<K: Clone, V, S> Iterator for Keys<'_, K, V, S> {
    type Item = K;
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(|k, _| k.clone())
    }
}

impl<K: Clone, V, S> FusedIterator for Keys<'_, K, V, S> {}

/// Iterator over owned values in key insertion order.
pub struct Values<'a, K, V, S = RandomState> {
    pub(crate) cursor: Cursor<'a, K, V, S>,
}

impl<K, V: Clone, S> Iterator for Values<'_, K, V, S> {
    type Item = V;
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(|_, v| v.clone())
    }
}

impl<K, V: Clone, S> FusedIterator for Values<'_, K, V, S> {}
