//! Bucket for the extendible directories.
//!
//! - Fixed key capacity, chosen by the owning directory
//! - `first_address`: smallest directory index pointing at the bucket, used
//!   as its identity
//! - `local_depth`: low hash bits shared by every key in the bucket
//!
//! A hybrid directory uses capacity 1, where "full" and "occupied" coincide.

/// Bucket holding up to `capacity` keys
#[derive(Debug, Clone)]
pub struct Bucket {
    first_address: usize,
    local_depth: u8,
    capacity: usize,
    keys: Vec<u64>,
}

impl Bucket {
    pub(crate) fn new(first_address: usize, local_depth: u8, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            first_address,
            local_depth,
            capacity,
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Smallest directory index referencing this bucket
    #[inline]
    pub fn first_address(&self) -> usize {
        self.first_address
    }

    #[inline]
    pub fn local_depth(&self) -> u8 {
        self.local_depth
    }

    #[inline]
    pub(crate) fn set_local_depth(&mut self, depth: u8) {
        self.local_depth = depth;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys in insertion order
    #[inline]
    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.capacity
    }

    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        self.keys.contains(&key)
    }

    /// Append `key`
    ///
    /// Returns `Err(key)` if the bucket is full.
    /// Does NOT check for duplicates.
    #[inline]
    pub(crate) fn push(&mut self, key: u64) -> Result<(), u64> {
        if self.is_full() {
            return Err(key);
        }
        self.keys.push(key);
        Ok(())
    }

    /// Put `key` in place of the oldest resident, returning the resident
    pub(crate) fn replace_oldest(&mut self, key: u64) -> Option<u64> {
        let slot = self.keys.first_mut()?;
        Some(std::mem::replace(slot, key))
    }

    /// Remove `key`, returning whether it was present
    pub(crate) fn remove(&mut self, key: u64) -> bool {
        match self.keys.iter().position(|&k| k == key) {
            Some(slot) => {
                self.keys.remove(slot);
                true
            }
            None => false,
        }
    }

    /// Empty the bucket, handing back its keys
    pub(crate) fn take_keys(&mut self) -> Vec<u64> {
        std::mem::replace(&mut self.keys, Vec::with_capacity(self.capacity))
    }
}
