use crate::error::CollectionError;

/// Operations shared by a bidirectional map and its inverse view.
///
/// Implementors are handles with interior mutability, so mutators take
/// `&self`. `inverse().inverse()` names the same state as `self`.
pub trait BiMap<K, V> {
    /// The view with keys and values swapped.
    type Inverse: BiMap<V, K, Inverse = Self>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool;

    fn contains_value(&self, value: &V) -> bool;

    fn get_cloned(&self, key: &K) -> Option<V>;

    /// Map `key` to `value`; rejects a conflicting mapping.
    fn set(&self, key: K, value: V) -> Result<&Self, CollectionError>;

    /// Map `key` to `value`, displacing conflicting mappings.
    fn force_set(&self, key: K, value: V) -> &Self;

    fn remove(&self, key: &K) -> bool;

    fn clear(&self);

    fn inverse(&self) -> Self::Inverse;
}
