//! Errors returned by mutating collection operations.

use thiserror::Error;

/// A rejected mutation. The collection is left unchanged.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum CollectionError {
    /// The key is already mapped to a different value.
    #[error("key already present")]
    KeyConflict,
    /// The value is already mapped from a different key.
    #[error("value already present")]
    ValueConflict,
    /// An occurrence count below one was requested.
    #[error("attempted to set a count of {0}, which is < 1")]
    InvalidCount(usize),
}
