//! bimap-collections: bidirectional hash maps with a live inverse view,
//! plus multimaps, a multiset and read-only variants.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a one-to-one map whose reverse lookup costs the same as its
//!   forward lookup, without storing each pair twice.
//! - Layers:
//!   - RawBiMap<K, V, S>: structural layer. One `SlotMap` arena of
//!     entries, two bucket tables (by key hash and by value hash) whose
//!     chains are threaded through the entries, and a doubly linked
//!     insertion-order list. Includes a debug-only reentrancy guard.
//!   - HashBiMap<K, V, S> / Inverse<K, V, S>: public handles sharing one
//!     `Rc<RefCell<RawBiMap>>`. The inverse is a view, not a copy: both
//!     handles call the same routines with the roles of key and value
//!     swapped.
//!   - ImmutableBiMap<K, V, S>: owns a `RawBiMap` directly; read-only.
//! - Alongside: MapMultiset, ArrayMultimap and MultisetMultimap over
//!   `hashbrown::HashMap`, and their frozen counterparts.
//!
//! Constraints
//! - Single-threaded: the handles are `!Send`/`!Sync` (they hold an `Rc`).
//! - Bijection: no two entries share a key and no two share a value.
//! - A rejected `set` changes nothing; both conflicts are detected before
//!   the first link is touched.
//! - Iteration follows insertion order. Replacing a key's value keeps the
//!   key where it was.
//!
//! Hashing and resizing
//! - Hashes are folded to 32 bits and smeared (Murmur3 mix) so bucket
//!   indexes can be taken from the low bits. Each entry caches both
//!   smeared hashes; `Hash` is never called again after insertion.
//! - Tables are powers of two and double when `len > table_len`. Rehash
//!   walks the order list and relinks the bucket chains; the order list
//!   itself is untouched.
//!
//! Reentrancy policy and interior mutability
//! - RawBiMap only calls user code through `K`/`V`: `Hash` and `Eq`
//!   while probing. A debug-only guard panics if that code calls back
//!   into the same map.
//! - The handles never run user `Drop` code while the `RefCell` is
//!   borrowed: displaced and removed pairs are handed back by RawBiMap
//!   and dropped after the borrow ends.
//! - Handle iterators hold no borrow between steps. They remember the
//!   generational arena key of the next entry; if that entry is removed
//!   the traversal ends.
//!
//! Notes and non-goals
//! - No thread safety, no persistence, no sorted views.
//! - `ImmutableBiMap` and friends have no mutators at all, so attempting
//!   to change one is a compile error rather than a runtime one.
//! - Public API surface is the collection types and their traits;
//!   RawBiMap is exposed only with the `bench_internal` feature.

mod bimap;
mod error;
pub mod hash_bimap;
pub mod hashing;
pub mod immutable;
pub mod inverse;
pub mod multimap;
pub mod multiset;
mod raw_bimap;
mod raw_bimap_proptest;
mod reentrancy;

// Public surface
pub use bimap::BiMap;
pub use error::CollectionError;
pub use hash_bimap::HashBiMap;
pub use immutable::{ImmutableBiMap, ImmutableInverse, ImmutableMultimap, ImmutableMultiset};
pub use inverse::Inverse;
pub use multimap::{ArrayMultimap, Multimap, MultisetMultimap};
pub use multiset::MapMultiset;

#[cfg(feature = "bench_internal")]
pub use raw_bimap::{PutResult, RawBiMap, Rejected};
