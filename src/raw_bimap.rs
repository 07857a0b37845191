//! RawBiMap: structural layer with two bucket-chain indexes over one arena.
//!
//! Every association is stored once, as a `BiEntry` in a `SlotMap`. The
//! entry is threaded through three intrusive lists at the same time:
//! - the singly linked chain of its key bucket (`key_hash & mask`),
//! - the singly linked chain of its value bucket (`value_hash & mask`),
//! - the doubly linked insertion-order list (`head` .. `tail`).
//!
//! Links are generational arena keys, never pointers, and no key of the
//! arena escapes this module except as an opaque iteration cursor.
//! Hashes are smeared once on insertion and cached on the entry; chain
//! scans compare the cached hash before calling `Eq`, and rehashing never
//! calls `Hash`.

use crate::error::CollectionError;
use crate::hashing::{closed_table_size, needs_resizing, smeared_hash};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use slotmap::{new_key_type, SlotMap};
use std::collections::hash_map::RandomState;

/// Fixed load factor; tables double once `len > table_len`.
pub(crate) const LOAD_FACTOR: f64 = 1.0;
/// Expected size used by `new()`.
pub(crate) const DEFAULT_EXPECTED_SIZE: usize = 16;

new_key_type! {
    /// Arena index of a live `BiEntry`.
    pub(crate) struct EntryKey;
}

type Link = Option<EntryKey>;

#[derive(Clone, Debug)]
pub(crate) struct BiEntry<K, V> {
    key: K,
    value: V,
    key_hash: u32,
    value_hash: u32,
    next_in_key_bucket: Link,
    next_in_value_bucket: Link,
    prev_in_order: Link,
    next_in_order: Link,
}

/// Outcome of a successful [`RawBiMap::put`].
#[derive(Debug, PartialEq, Eq)]
pub enum PutResult<K, V> {
    /// The exact mapping was already present; the arguments are handed
    /// back untouched.
    Unchanged { key: K, value: V },
    /// A new entry was linked in. Under `force`, up to two older entries
    /// were displaced: the one holding the key and the one holding the
    /// value.
    Inserted {
        old_for_key: Option<(K, V)>,
        old_for_value: Option<(K, V)>,
    },
}

/// A rejected [`RawBiMap::put`]; the map is unchanged and the arguments
/// are handed back.
#[derive(Debug, PartialEq, Eq)]
pub struct Rejected<K, V> {
    pub error: CollectionError,
    pub key: K,
    pub value: V,
}

/// Bucket tables, arena and order list. Split from `RawBiMap` so the
/// reentrancy guard can stay borrowed while these are mutated.
#[derive(Clone)]
struct BiTable<K, V> {
    entries: SlotMap<EntryKey, BiEntry<K, V>>,
    key_table: Box<[Link]>,
    value_table: Box<[Link]>,
    head: Link,
    tail: Link,
    mask: usize,
    modification_count: u64,
}

fn new_table(len: usize) -> Box<[Link]> {
    vec![None; len].into_boxed_slice()
}

// Remove `target` from the singly linked chain starting at `head`,
// following the chain through `link`.
fn splice_out<K, V>(
    head: &mut Link,
    entries: &mut SlotMap<EntryKey, BiEntry<K, V>>,
    target: EntryKey,
    link: fn(&mut BiEntry<K, V>) -> &mut Link,
) {
    let after = *link(&mut entries[target]);
    if *head == Some(target) {
        *head = after;
        return;
    }
    let mut cursor = *head;
    while let Some(c) = cursor {
        let next = link(&mut entries[c]);
        if *next == Some(target) {
            *next = after;
            return;
        }
        cursor = *next;
    }
    debug_assert!(false, "entry missing from its bucket chain");
}

impl<K, V> BiTable<K, V> {
    fn with_table_size(table_size: usize) -> Self {
        debug_assert!(table_size.is_power_of_two());
        Self {
            entries: SlotMap::with_key(),
            key_table: new_table(table_size),
            value_table: new_table(table_size),
            head: None,
            tail: None,
            mask: table_size - 1,
            modification_count: 0,
        }
    }

    #[inline]
    fn bucket(&self, hash: u32) -> usize {
        hash as usize & self.mask
    }

    fn seek_by_key<Q>(&self, key: &Q, key_hash: u32) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cursor = self.key_table[self.bucket(key_hash)];
        while let Some(k) = cursor {
            let e = &self.entries[k];
            if e.key_hash == key_hash && e.key.borrow() == key {
                return Some(k);
            }
            cursor = e.next_in_key_bucket;
        }
        None
    }

    fn seek_by_value<Q>(&self, value: &Q, value_hash: u32) -> Link
    where
        V: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cursor = self.value_table[self.bucket(value_hash)];
        while let Some(k) = cursor {
            let e = &self.entries[k];
            if e.value_hash == value_hash && e.value.borrow() == value {
                return Some(k);
            }
            cursor = e.next_in_value_bucket;
        }
        None
    }

    // Prepend `k` to both of its bucket chains.
    fn link_into_buckets(&mut self, k: EntryKey) {
        let (kb, vb) = {
            let e = &self.entries[k];
            (self.bucket(e.key_hash), self.bucket(e.value_hash))
        };
        let e = &mut self.entries[k];
        e.next_in_key_bucket = self.key_table[kb];
        e.next_in_value_bucket = self.value_table[vb];
        self.key_table[kb] = Some(k);
        self.value_table[vb] = Some(k);
    }

    fn unlink_from_buckets(&mut self, k: EntryKey) {
        let (kb, vb) = {
            let e = &self.entries[k];
            (self.bucket(e.key_hash), self.bucket(e.value_hash))
        };
        splice_out(&mut self.key_table[kb], &mut self.entries, k, |e| {
            &mut e.next_in_key_bucket
        });
        splice_out(&mut self.value_table[vb], &mut self.entries, k, |e| {
            &mut e.next_in_value_bucket
        });
    }

    // Fully remove `k`: both chains, the order list and the arena.
    fn unlink(&mut self, k: EntryKey) -> (K, V) {
        self.unlink_from_buckets(k);
        let e = self
            .entries
            .remove(k)
            .expect("entry must be live while linked");
        match e.prev_in_order {
            Some(p) => self.entries[p].next_in_order = e.next_in_order,
            None => self.head = e.next_in_order,
        }
        match e.next_in_order {
            Some(n) => self.entries[n].prev_in_order = e.prev_in_order,
            None => self.tail = e.prev_in_order,
        }
        self.modification_count += 1;
        (e.key, e.value)
    }

    fn put(
        &mut self,
        key: K,
        key_hash: u32,
        value: V,
        value_hash: u32,
        force: bool,
    ) -> Result<PutResult<K, V>, Rejected<K, V>>
    where
        K: Eq,
        V: Eq,
    {
        let old_for_value = self.seek_by_value(&value, value_hash);
        if let Some(ov) = old_for_value {
            let e = &self.entries[ov];
            if e.key_hash == key_hash && e.key == key {
                return Ok(PutResult::Unchanged { key, value });
            }
        }
        let old_for_key = self.seek_by_key(&key, key_hash);

        // Both conflicts are decided before anything is touched.
        if !force {
            let error = if old_for_key.is_some() {
                Some(CollectionError::KeyConflict)
            } else if old_for_value.is_some() {
                Some(CollectionError::ValueConflict)
            } else {
                None
            };
            if let Some(error) = error {
                return Err(Rejected { error, key, value });
            }
        }

        // A replaced key keeps its place in insertion order; the new entry
        // takes over the old entry's neighbours.
        let (prev, next, old_key_pair) = match old_for_key {
            Some(ok) => {
                self.unlink_from_buckets(ok);
                let old = self
                    .entries
                    .remove(ok)
                    .expect("entry found by key must be live");
                (old.prev_in_order, old.next_in_order, Some((old.key, old.value)))
            }
            None => (self.tail, None, None),
        };

        let new = self.entries.insert(BiEntry {
            key,
            value,
            key_hash,
            value_hash,
            next_in_key_bucket: None,
            next_in_value_bucket: None,
            prev_in_order: prev,
            next_in_order: next,
        });
        self.link_into_buckets(new);
        match prev {
            Some(p) => self.entries[p].next_in_order = Some(new),
            None => self.head = Some(new),
        }
        match next {
            Some(n) => self.entries[n].prev_in_order = Some(new),
            None => self.tail = Some(new),
        }
        self.modification_count += 1;

        let old_value_pair = old_for_value.map(|ov| self.unlink(ov));
        Ok(PutResult::Inserted {
            old_for_key: old_key_pair,
            old_for_value: old_value_pair,
        })
    }

    fn rehash_if_necessary(&mut self) {
        let old_len = self.key_table.len();
        if !needs_resizing(self.entries.len(), old_len, LOAD_FACTOR) {
            return;
        }
        let new_len = old_len * 2;
        log::trace!(
            "bimap resize: {} -> {} buckets for {} entries",
            old_len,
            new_len,
            self.entries.len()
        );
        self.key_table = new_table(new_len);
        self.value_table = new_table(new_len);
        self.mask = new_len - 1;

        let mut cursor = self.head;
        while let Some(k) = cursor {
            self.link_into_buckets(k);
            cursor = self.entries[k].next_in_order;
        }
        self.modification_count += 1;
    }

    fn clear(&mut self) -> Vec<(K, V)> {
        self.key_table.fill(None);
        self.value_table.fill(None);
        self.head = None;
        self.tail = None;
        self.modification_count += 1;
        // Draining keeps slot generations, so stale cursors stay stale.
        self.entries
            .drain()
            .map(|(_, e)| (e.key, e.value))
            .collect()
    }
}

/// Bidirectional hash map with insertion-ordered iteration.
///
/// This is the storage behind `HashBiMap` and `ImmutableBiMap`; it is
/// public only with the `bench_internal` feature.
pub struct RawBiMap<K, V, S = RandomState> {
    hasher: S,
    table: BiTable<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> RawBiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_expected_size(DEFAULT_EXPECTED_SIZE)
    }

    pub fn with_expected_size(expected_size: usize) -> Self {
        Self::with_expected_size_and_hasher(expected_size, RandomState::new())
    }
}

impl<K, V> Default for RawBiMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> RawBiMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_expected_size_and_hasher(DEFAULT_EXPECTED_SIZE, hasher)
    }

    pub fn with_expected_size_and_hasher(expected_size: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: BiTable::with_table_size(closed_table_size(expected_size, LOAD_FACTOR)),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Current number of buckets in each table.
    pub fn capacity(&self) -> usize {
        self.table.key_table.len()
    }

    /// Incremented on every structural change.
    pub fn modification_count(&self) -> u64 {
        self.table.modification_count
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let hash = smeared_hash(&self.hasher, key);
        self.table
            .seek_by_key(key, hash)
            .map(|k| &self.table.entries[k].value)
    }

    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_by_value");
        let hash = smeared_hash(&self.hasher, value);
        self.table
            .seek_by_value(value, hash)
            .map(|k| &self.table.entries[k].key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        let hash = smeared_hash(&self.hasher, key);
        self.table.seek_by_key(key, hash).is_some()
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_value");
        let hash = smeared_hash(&self.hasher, value);
        self.table.seek_by_value(value, hash).is_some()
    }

    /// Associate `key` with `value`.
    ///
    /// Without `force`, an existing different mapping for either side is
    /// rejected and nothing changes. With `force`, the conflicting
    /// mappings are removed and returned; a replaced key keeps its
    /// position in iteration order.
    pub fn put(
        &mut self,
        key: K,
        value: V,
        force: bool,
    ) -> Result<PutResult<K, V>, Rejected<K, V>> {
        let _g = self.reentrancy.enter("put");
        let key_hash = smeared_hash(&self.hasher, &key);
        let value_hash = smeared_hash(&self.hasher, &value);
        let res = self.table.put(key, key_hash, value, value_hash, force)?;
        if let PutResult::Inserted {
            old_for_key,
            old_for_value,
        } = &res
        {
            let displaced = old_for_key.is_some() as usize + old_for_value.is_some() as usize;
            if displaced > 0 {
                log::debug!("forced bimap put displaced {} mapping(s)", displaced);
            }
            self.table.rehash_if_necessary();
        }
        Ok(res)
    }

    pub fn remove_by_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove_by_key");
        let hash = smeared_hash(&self.hasher, key);
        let k = self.table.seek_by_key(key, hash)?;
        Some(self.table.unlink(k))
    }

    pub fn remove_by_value<Q>(&mut self, value: &Q) -> Option<(K, V)>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove_by_value");
        let hash = smeared_hash(&self.hasher, value);
        let k = self.table.seek_by_value(value, hash)?;
        Some(self.table.unlink(k))
    }

    /// Remove every entry, keeping the table capacity. The removed pairs
    /// are returned so the caller decides where they are dropped.
    pub fn clear(&mut self) -> Vec<(K, V)> {
        let _g = self.reentrancy.enter("clear");
        self.table.clear()
    }
}

impl<K, V, S> RawBiMap<K, V, S> {
    /// Entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: &self.table.entries,
            cursor: self.table.head,
            remaining: self.table.entries.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub(crate) fn head(&self) -> Option<EntryKey> {
        self.table.head
    }

    /// Resolve an iteration cursor. `None` if the entry it names is gone.
    pub(crate) fn at(&self, cursor: EntryKey) -> Option<(&K, &V, Option<EntryKey>)> {
        self.table
            .entries
            .get(cursor)
            .map(|e| (&e.key, &e.value, e.next_in_order))
    }

    /// Walk every structure and panic on any broken invariant.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: Eq,
        V: Eq,
    {
        let t = &self.table;
        assert!(t.key_table.len().is_power_of_two());
        assert_eq!(t.key_table.len(), t.value_table.len());
        assert_eq!(t.mask, t.key_table.len() - 1);

        // Order list: forward walk with back-pointer check.
        let mut seen = 0;
        let mut prev = None;
        let mut cursor = t.head;
        while let Some(k) = cursor {
            let e = &t.entries[k];
            assert_eq!(e.prev_in_order, prev, "broken back-pointer");
            prev = Some(k);
            cursor = e.next_in_order;
            seen += 1;
            assert!(seen <= t.entries.len(), "cycle in order list");
        }
        assert_eq!(t.tail, prev);
        assert_eq!(seen, t.entries.len());

        // Each chain holds exactly the entries hashing to its bucket.
        let mut in_key_chains = 0;
        let mut in_value_chains = 0;
        for b in 0..t.key_table.len() {
            let mut c = t.key_table[b];
            while let Some(k) = c {
                assert_eq!(t.bucket(t.entries[k].key_hash), b);
                in_key_chains += 1;
                c = t.entries[k].next_in_key_bucket;
            }
            let mut c = t.value_table[b];
            while let Some(k) = c {
                assert_eq!(t.bucket(t.entries[k].value_hash), b);
                in_value_chains += 1;
                c = t.entries[k].next_in_value_bucket;
            }
        }
        assert_eq!(in_key_chains, t.entries.len());
        assert_eq!(in_value_chains, t.entries.len());

        // Bijection: every entry is the unique hit for its key and value.
        for (k, e) in t.entries.iter() {
            assert_eq!(t.seek_by_key(&e.key, e.key_hash), Some(k));
            assert_eq!(t.seek_by_value(&e.value, e.value_hash), Some(k));
        }
    }
}

impl<K, V, S> Clone for RawBiMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Deep copy. Arena keys are preserved by `SlotMap::clone`, so the
    /// copied links stay valid as-is.
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for RawBiMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(&K, &V)` in insertion order.
pub struct Iter<'a, K, V> {
    entries: &'a SlotMap<EntryKey, BiEntry<K, V>>,
    cursor: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries;
        let e = &entries[self.cursor?];
        self.cursor = e.next_in_order;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            entries: self.entries,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

/// Iterator over keys in insertion order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over values in key insertion order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a RawBiMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
