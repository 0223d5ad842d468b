//! The contract shared by every set

use crate::{error::Result, iter::Keys, stats::Stats};

/// A dynamically growing set of `u64` keys
pub trait KeySet {
    /// Insert `key`, growing the set if needed
    ///
    /// Returns `Ok(true)` if the key was new and `Ok(false)` if it was already
    /// present, in which case nothing changes.
    fn try_insert(&mut self, key: u64) -> Result<bool>;

    /// Return `true` if the set holds `key`
    fn contains(&self, key: u64) -> bool;

    /// Returns the number of keys in the set
    fn len(&self) -> usize;

    /// Keys the current storage holds before it must grow
    fn capacity(&self) -> usize;

    fn stats(&self) -> Stats;

    fn keys(&self) -> Keys<'_>;

    /// Insert `key`, reporting capacity exhaustion as `false`
    ///
    /// Returns `true` only if the key was newly inserted.
    fn insert(&mut self, key: u64) -> bool {
        match self.try_insert(key) {
            Ok(inserted) => inserted,
            Err(err) => {
                tracing::error!(key, %err, "insert failed");
                false
            }
        }
    }

    /// Returns `true` if the set contains no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
