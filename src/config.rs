//! Construction parameters for each set
//!
//! Every config has a `Default` and chained `with_*` setters, and is checked
//! by `validate` when a set is built from it.

use crate::error::{Error, Result};

/// Initial slot count (or directory size) when none is given
pub const DEFAULT_INITIAL_SIZE: usize = 4;

/// Absolute bound on any single array or directory
pub const DEFAULT_MAX_CAPACITY: usize = 1 << 26;

/// Keys per bucket in an `ExtendibleSet` when none is given
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Displacements a `CuckooSet` chain may take before the tables are rehashed
pub const DEFAULT_CUCKOO_MAX_CHAIN: usize = 32;

/// Displacements a `HybridSet` chain may take before the contended bucket is split
pub const DEFAULT_HYBRID_MAX_CHAIN: usize = 34;

fn check_sizes(initial_size: usize, max_capacity: usize) -> Result<()> {
    if initial_size == 0 {
        return Err(Error::InvalidConfig("initial size must be at least 1"));
    }
    if max_capacity == 0 {
        return Err(Error::InvalidConfig("maximum capacity must be at least 1"));
    }
    if initial_size > max_capacity {
        return Err(Error::InvalidConfig(
            "initial size must not exceed the maximum capacity",
        ));
    }
    Ok(())
}

fn check_directory_size(initial_size: usize, max_capacity: usize) -> Result<()> {
    match initial_size.checked_next_power_of_two() {
        Some(size) if size <= max_capacity => Ok(()),
        _ => Err(Error::InvalidConfig(
            "initial directory size rounds up past the maximum capacity",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearConfig {
    /// Slots in the array at creation
    pub initial_size: usize,
    pub max_capacity: usize,
}

impl LinearConfig {
    pub const fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sizes(self.initial_size, self.max_capacity)
    }
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuckooConfig {
    /// Slots in each of the two tables at creation
    pub initial_size: usize,
    /// Bound on the size of each table
    pub max_capacity: usize,
    pub max_chain: usize,
}

impl CuckooConfig {
    pub const fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            max_capacity: DEFAULT_MAX_CAPACITY,
            max_chain: DEFAULT_CUCKOO_MAX_CHAIN,
        }
    }

    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sizes(self.initial_size, self.max_capacity)
    }
}

impl Default for CuckooConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendibleConfig {
    /// Directory entries at creation, rounded up to a power of two
    pub initial_size: usize,
    /// Keys each bucket holds before it must split
    pub bucket_capacity: usize,
    /// Bound on the number of directory entries
    pub max_capacity: usize,
}

impl ExtendibleConfig {
    pub const fn new(bucket_capacity: usize) -> Self {
        Self {
            initial_size: 1,
            bucket_capacity,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    pub const fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(Error::InvalidConfig("bucket capacity must be at least 1"));
        }
        check_sizes(self.initial_size, self.max_capacity)?;
        check_directory_size(self.initial_size, self.max_capacity)
    }

    /// Global depth of a directory with `initial_size` entries
    pub(crate) fn initial_depth(&self) -> u8 {
        self.initial_size.next_power_of_two().trailing_zeros() as u8
    }
}

impl Default for ExtendibleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridConfig {
    /// Entries in each directory at creation, rounded up to a power of two
    pub initial_size: usize,
    /// Bound on the entries of each directory
    pub max_capacity: usize,
    pub max_chain: usize,
}

impl HybridConfig {
    pub const fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            max_capacity: DEFAULT_MAX_CAPACITY,
            max_chain: DEFAULT_HYBRID_MAX_CHAIN,
        }
    }

    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sizes(self.initial_size, self.max_capacity)?;
        check_directory_size(self.initial_size, self.max_capacity)
    }

    pub(crate) fn initial_depth(&self) -> u8 {
        self.initial_size.next_power_of_two().trailing_zeros() as u8
    }
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LinearConfig::default().validate().is_ok());
        assert!(CuckooConfig::default().validate().is_ok());
        assert!(ExtendibleConfig::default().validate().is_ok());
        assert!(HybridConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(LinearConfig::new(0).validate().is_err());
        assert!(CuckooConfig::new(4).with_max_capacity(0).validate().is_err());
        assert!(ExtendibleConfig::new(0).validate().is_err());
        assert!(HybridConfig::new(0).validate().is_err());
    }

    #[test]
    fn test_initial_above_max_rejected() {
        assert!(LinearConfig::new(16).with_max_capacity(8).validate().is_err());
        assert!(LinearConfig::new(8).with_max_capacity(8).validate().is_ok());

        // 5 rounds up to 8 directory entries
        let config = ExtendibleConfig::new(2)
            .with_initial_size(5)
            .with_max_capacity(6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_depth() {
        assert_eq!(ExtendibleConfig::new(2).initial_depth(), 0);
        assert_eq!(ExtendibleConfig::new(2).with_initial_size(4).initial_depth(), 2);
        assert_eq!(ExtendibleConfig::new(2).with_initial_size(5).initial_depth(), 3);
        assert_eq!(HybridConfig::new(16).initial_depth(), 4);
    }

    #[test]
    fn test_setters() {
        let config = CuckooConfig::new(8).with_max_chain(6).with_max_capacity(64);
        assert_eq!(config.initial_size, 8);
        assert_eq!(config.max_chain, 6);
        assert_eq!(config.max_capacity, 64);
    }
}
