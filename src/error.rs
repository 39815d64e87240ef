//! Error type shared by every fallible map operation.

use thiserror::Error;

/// Failures surfaced by `ChainedHashMap`.
///
/// Plain absence (a lookup miss, or removing a key from a bucket that holds
/// other keys) is reported through `Option`/`bool` returns instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A constructor argument was missing or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `add` was called with a key that is already stored.
    #[error("can't add existing key")]
    DuplicateKey,

    /// `remove` targeted a bucket that holds no chain at all.
    #[error("key doesn't exist")]
    KeyMissing,

    /// Indexed read of a key that is not stored.
    #[error("key not found")]
    KeyNotFound,
}

impl MapError {
    /// True for the errors caused by the map's current contents rather than
    /// by the arguments themselves (`DuplicateKey`, `KeyMissing`).
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, MapError::DuplicateKey | MapError::KeyMissing)
    }
}
