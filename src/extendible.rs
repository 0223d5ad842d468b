use crate::{
    config::ExtendibleConfig,
    directory::Directory,
    error::Result,
    hash::{KeyHasher, MixHasher},
    iter::{Buckets, Keys},
    set::KeySet,
    stats::{Counters, Stats},
};

/// A hash set using extendible hashing with multi-key buckets
///
/// Keys are addressed by the low `global_depth` bits of `h1`. A full bucket
/// is split in two, doubling the directory first when the bucket is down to
/// its last directory entry.
pub struct ExtendibleSet<H = MixHasher> {
    directory: Directory,
    hasher: H,
    counters: Counters,
}

impl ExtendibleSet<MixHasher> {
    /// Create an empty `ExtendibleSet` with the default configuration
    #[inline]
    pub fn new() -> Self {
        Self::build(ExtendibleConfig::default(), MixHasher::new())
    }

    pub fn with_config(config: ExtendibleConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, MixHasher::new())
    }
}

impl<H> ExtendibleSet<H> {
    fn build(config: ExtendibleConfig, hasher: H) -> Self {
        Self {
            directory: Directory::with_depth(
                config.initial_depth(),
                config.bucket_capacity,
                config.max_capacity,
            ),
            hasher,
            counters: Counters::default(),
        }
    }

    /// Returns the number of keys in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directory.len() == 0
    }

    /// Returns the global depth of the directory
    #[inline]
    pub fn global_depth(&self) -> u8 {
        self.directory.global_depth()
    }

    /// Returns the number of directory entries
    #[inline]
    pub fn directory_size(&self) -> usize {
        self.directory.size()
    }

    /// Returns the number of distinct buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.directory.bucket_count()
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.directory.bucket_capacity()
    }

    /// Keys the current buckets hold before another split
    #[inline]
    pub fn capacity(&self) -> usize {
        self.directory.bucket_count() * self.directory.bucket_capacity()
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Each physical bucket once, in order of first address
    pub fn buckets(&self) -> Buckets<'_> {
        Buckets::new(self.directory.buckets())
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.directory.keys())
    }

    pub fn stats(&self) -> Stats {
        Stats {
            len: self.len(),
            capacity: self.capacity(),
            buckets: self.bucket_count(),
            counters: self.counters.merge(self.directory.counters()),
        }
    }
}

impl<H: KeyHasher> ExtendibleSet<H> {
    /// Create an empty `ExtendibleSet` with provided configuration and hasher
    pub fn with_config_and_hasher(config: ExtendibleConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    /// Return `true` if the addressed bucket holds `key`
    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        self.directory.contains(self.hasher.h1(key), key)
    }

    /// Insert `key`, splitting its bucket until there is room
    ///
    /// Returns `Ok(false)` without changing anything if `key` is present.
    /// On `Err` the directory could not grow; no key has been lost.
    pub fn try_insert(&mut self, key: u64) -> Result<bool> {
        let hash = self.hasher.h1(key);
        if self.directory.contains(hash, key) {
            return Ok(false);
        }

        let mut first_attempt = true;
        while self.directory.try_push(hash, key).is_err() {
            if first_attempt {
                self.counters.collisions += 1;
                first_attempt = false;
            }

            // the address is recomputed from `hash` on the next push
            let hasher = &self.hasher;
            self.directory.split(hash, |k| hasher.h1(k))?;
        }

        Ok(true)
    }

    /// Insert `key`; capacity exhaustion is logged and reported as `false`
    pub fn insert(&mut self, key: u64) -> bool {
        KeySet::insert(self, key)
    }
}

impl<H: KeyHasher> KeySet for ExtendibleSet<H> {
    fn try_insert(&mut self, key: u64) -> Result<bool> {
        ExtendibleSet::try_insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        ExtendibleSet::contains(self, key)
    }

    fn len(&self) -> usize {
        self.directory.len()
    }

    fn capacity(&self) -> usize {
        ExtendibleSet::capacity(self)
    }

    fn stats(&self) -> Stats {
        ExtendibleSet::stats(self)
    }

    fn keys(&self) -> Keys<'_> {
        ExtendibleSet::keys(self)
    }
}

impl Default for ExtendibleSet<MixHasher> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Identity;

    impl KeyHasher for Identity {
        fn h1(&self, key: u64) -> u64 {
            key
        }

        fn h2(&self, key: u64) -> u64 {
            key
        }
    }

    struct Constant;

    impl KeyHasher for Constant {
        fn h1(&self, _key: u64) -> u64 {
            0
        }

        fn h2(&self, _key: u64) -> u64 {
            0
        }
    }

    #[test]
    fn test_new() {
        let set = ExtendibleSet::new();
        assert!(set.is_empty());
        assert_eq!(set.global_depth(), 0);
        assert_eq!(set.bucket_count(), 1);
        assert_eq!(set.bucket_capacity(), crate::config::DEFAULT_BUCKET_CAPACITY);
    }

    #[test]
    fn test_initial_size_sets_depth() {
        let config = ExtendibleConfig::new(2).with_initial_size(6);
        let set = ExtendibleSet::with_config(config).unwrap();
        assert_eq!(set.global_depth(), 3);
        assert_eq!(set.directory_size(), 8);
        assert_eq!(set.bucket_count(), 8);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = ExtendibleSet::new();

        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(!set.insert(1));

        assert_eq!(set.len(), 2);
        assert!(set.contains(1));
        assert!(!set.contains(3));
    }

    #[test]
    fn test_shared_low_bits_split() {
        let config = ExtendibleConfig::new(2);
        let mut set = ExtendibleSet::with_config_and_hasher(config, Identity).unwrap();

        // all five end in 0b00
        let keys = [0u64, 4, 8, 12, 16];
        for key in keys {
            assert!(set.insert(key));
        }

        assert!(set.stats().counters.splits >= 1);
        assert!(set.global_depth() >= 3);
        for key in keys {
            assert!(set.contains(key), "Missing key {}", key);
        }
        assert_eq!(set.len(), 5);
        set.directory.check_invariants(|k| k);
    }

    #[test]
    fn test_split_layout() {
        let config = ExtendibleConfig::new(2);
        let mut set = ExtendibleSet::with_config_and_hasher(config, Identity).unwrap();
        for key in [0u64, 4, 8, 12, 16] {
            set.insert(key);
        }

        // 0 and 4 first separate at bit 2, then 0 and 8 at bit 3
        assert_eq!(set.global_depth(), 4);
        let layout: Vec<(usize, u8, Vec<u64>)> = set
            .buckets()
            .map(|b| (b.first_address(), b.local_depth(), b.keys().to_vec()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (0, 4, vec![0, 16]),
                (1, 1, vec![]),
                (2, 2, vec![]),
                (4, 3, vec![4, 12]),
                (8, 4, vec![8]),
            ]
        );
    }

    #[test]
    fn test_identical_hashes_exhaust_capacity() {
        let config = ExtendibleConfig::new(2).with_max_capacity(8);
        let mut set = ExtendibleSet::with_config_and_hasher(config, Constant).unwrap();

        assert!(set.insert(1));
        assert!(set.insert(2));
        assert_eq!(
            set.try_insert(3),
            Err(Error::CapacityExceeded {
                requested: 16,
                max: 8
            })
        );

        assert_eq!(set.len(), 2);
        assert!(set.contains(1));
        assert!(set.contains(2));
        assert!(!set.contains(3));
        set.directory.check_invariants(|_| 0);
    }

    #[test]
    fn test_many_inserts() {
        let mut set = ExtendibleSet::new();

        for i in 0u64..10_000 {
            assert!(set.insert(i));
        }

        assert_eq!(set.len(), 10_000);
        assert!(set.bucket_count() > 1, "Should have split into multiple buckets");
        assert!(set.global_depth() > 0, "Global depth should have increased");

        for i in 0u64..10_000 {
            assert!(set.contains(i), "Missing key {}", i);
        }
        let hasher = *set.hasher();
        set.directory.check_invariants(|k| hasher.h1(k));
    }

    #[test]
    fn test_stats() {
        let mut set = ExtendibleSet::with_config(ExtendibleConfig::new(3)).unwrap();
        for i in 0u64..100 {
            set.insert(i);
        }

        let stats = set.stats();
        assert_eq!(stats.len, 100);
        assert_eq!(stats.buckets, set.bucket_count());
        assert_eq!(stats.capacity, set.bucket_count() * 3);
        assert_eq!(stats.counters.splits as usize, set.bucket_count() - 1);
        assert!(stats.counters.growths >= set.global_depth() as u64);
    }
}
