use crate::bimap::BiMap;
use crate::error::CollectionError;
use crate::hash_bimap::{Cursor, HashBiMap, Keys, Shared, Values};
use core::cell::Ref;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Live view of a [`HashBiMap`] with keys and values swapped.
///
/// An `Inverse` is another handle onto the same state: mutations through
/// it are immediately visible through the primary map and vice versa.
/// Iteration follows the primary map's insertion order.
pub struct Inverse<K, V, S = RandomState> {
    inner: Shared<K, V, S>,
}

impl<K, V, S> Inverse<K, V, S> {
    pub(crate) fn from_shared(inner: Shared<K, V, S>) -> Self {
        Self { inner }
    }

    /// The primary map this view was taken from.
    pub fn inverse(&self) -> HashBiMap<K, V, S> {
        HashBiMap::from_shared(Rc::clone(&self.inner))
    }

    /// True if both views share the same underlying map.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Entries as owned `(V, K)` pairs.
    pub fn iter(&self) -> InverseIter<'_, K, V, S> {
        InverseIter {
            cursor: Cursor::new(&self.inner),
        }
    }

    /// The primary map's values.
    pub fn keys(&self) -> Values<'_, K, V, S> {
        Values {
            cursor: Cursor::new(&self.inner),
        }
    }

    /// The primary map's keys.
    pub fn values(&self) -> Keys<'_, K, V, S> {
        Keys {
            cursor: Cursor::new(&self.inner),
        }
    }
}

impl<K, V, S> Inverse<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// The key mapped to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<Ref<'_, K>>
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ref::filter_map(self.inner.borrow(), |m| m.get_by_value(value)).ok()
    }

    pub fn get_cloned<Q>(&self, value: &Q) -> Option<K>
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        K: Clone,
    {
        self.get(value).map(|k| (*k).clone())
    }

    /// Whether `value` is a value of the primary map.
    pub fn contains_key<Q>(&self, value: &Q) -> bool
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.borrow().contains_value(value)
    }

    /// Whether `key` is a key of the primary map.
    pub fn contains_value<Q>(&self, key: &Q) -> bool
    where
        K: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.borrow().contains_key(key)
    }

    /// Map `value` back to `key`; same conflict rules as
    /// [`HashBiMap::set`] with the roles swapped.
    pub fn set(&self, value: V, key: K) -> Result<&Self, CollectionError> {
        let res = self.inner.borrow_mut().put(key, value, false);
        match res {
            Ok(_) => Ok(self),
            Err(rejected) => Err(swap_conflict(rejected.error)),
        }
    }

    pub fn force_set(&self, value: V, key: K) -> &Self {
        let displaced = self.inner.borrow_mut().put(key, value, true);
        debug_assert!(displaced.is_ok(), "forced put cannot be rejected");
        drop(displaced);
        self
    }

    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(value).is_some()
    }

    pub fn remove_entry<Q>(&self, value: &Q) -> Option<(V, K)>
    where
        V: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = self.inner.borrow_mut().remove_by_value(value);
        removed.map(|(k, v)| (v, k))
    }

    pub fn clear(&self) {
        let drained = self.inner.borrow_mut().clear();
        drop(drained);
    }
}

// A conflict is reported from the caller's point of view: the inverse's
// keys are the primary map's values.
fn swap_conflict(e: CollectionError) -> CollectionError {
    match e {
        CollectionError::KeyConflict => CollectionError::ValueConflict,
        CollectionError::ValueConflict => CollectionError::KeyConflict,
        other => other,
    }
}

impl<K, V, S> Clone for Inverse<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Inverse<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(m) => f.debug_map().entries(m.iter().map(|(k, v)| (v, k))).finish(),
            Err(_) => f.write_str("Inverse { <borrowed> }"),
        }
    }
}

impl<'a, K: Clone, V: Clone, S> IntoIterator for &'a Inverse<K, V, S> {
    type Item = (V, K);
    type IntoIter = InverseIter<'a, K, V, S>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> BiMap<V, K> for Inverse<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Inverse = HashBiMap<K, V, S>;

    fn len(&self) -> usize {
        Inverse::len(self)
    }
    fn contains_key(&self, value: &V) -> bool {
        Inverse::contains_key(self, value)
    }
    fn contains_value(&self, key: &K) -> bool {
        Inverse::contains_value(self, key)
    }
    fn get_cloned(&self, value: &V) -> Option<K> {
        Inverse::get_cloned(self, value)
    }
    fn set(&self, value: V, key: K) -> Result<&Self, CollectionError> {
        Inverse::set(self, value, key)
    }
    fn force_set(&self, value: V, key: K) -> &Self {
        Inverse::force_set(self, value, key)
    }
    fn remove(&self, value: &V) -> bool {
        Inverse::remove(self, value)
    }
    fn clear(&self) {
        Inverse::clear(self)
    }
    fn inverse(&self) -> Self::Inverse {
        Inverse::inverse(self)
    }
}

/// Iterator over owned `(V, K)` pairs in the primary map's order.
pub struct InverseIter<'a, K, V, S = RandomState> {
    cursor: Cursor<'a, K, V, S>,
}

impl<K: Clone, V: Clone, S> Iterator for InverseIter<'_, K, V, S> {
    type Item = (V, K);
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(|k, v| (v.clone(), k.clone()))
    }
}

impl<K: Clone, V: Clone, S> FusedIterator for InverseIter<'_, K, V, S> {}
