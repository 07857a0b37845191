//! Hash smearing and table sizing shared by the hash-indexed collections.
//!
//! Bucket indexes are taken from the low bits of a 32-bit hash (`hash &
//! mask`), so raw hashes are smeared first to spread entropy into those
//! bits. The smear is the Murmur3 mixing step and is reproduced
//! bit-for-bit.

use core::hash::{BuildHasher, Hash};

/// Largest table length a collection will grow to. Bucket indexes stay
/// well inside `u32` arithmetic below this bound.
pub const MAX_TABLE_SIZE: usize = 1 << 30;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Mix a raw hash so that its low bits are usable as a bucket index.
#[inline]
pub fn smear(hash: u32) -> u32 {
    C2.wrapping_mul(hash.wrapping_mul(C1).rotate_left(15))
}

/// Hash `value` with `hasher` and fold the result down to 32 bits.
#[inline]
pub fn hash_of<S, Q>(hasher: &S, value: &Q) -> u32
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    let h = hasher.hash_one(value);
    (h ^ (h >> 32)) as u32
}

/// `smear(hash_of(hasher, value))`.
#[inline]
pub fn smeared_hash<S, Q>(hasher: &S, value: &Q) -> u32
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    smear(hash_of(hasher, value))
}

/// Largest power of two `<= x`, or 0 when `x == 0`.
#[inline]
pub fn nearest_lower_power_of_two(x: usize) -> usize {
    if x == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - x.leading_zeros())
    }
}

/// Smallest power-of-two table length `t` such that
/// `expected_entries <= load_factor * t`, never below 1 and never above
/// [`MAX_TABLE_SIZE`].
pub fn closed_table_size(expected_entries: usize, load_factor: f64) -> usize {
    let expected = expected_entries.clamp(1, MAX_TABLE_SIZE) as f64;
    let mut table_size = 1;
    while expected > load_factor * table_size as f64 && table_size < MAX_TABLE_SIZE {
        table_size <<= 1;
    }
    table_size
}

/// Whether a table of `table_size` holding `size` entries should double.
#[inline]
pub fn needs_resizing(size: usize, table_size: usize, load_factor: f64) -> bool {
    size as f64 > load_factor * table_size as f64 && table_size < MAX_TABLE_SIZE
}
