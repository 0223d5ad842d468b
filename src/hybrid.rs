//! Extendible hashing combined with cuckoo displacement.
//!
//! - Two independent directories of single-key buckets, the first addressed
//!   by `h1` and the second by `h2`
//! - Insert targets the less loaded directory and displaces residents back
//!   and forth between the two, as `CuckooSet` does between its tables
//! - A chain longer than `max_chain` splits only the contended bucket instead
//!   of rebuilding everything, then re-addresses the displaced key
//!
//! Every split raises a bucket's local depth and adds a bucket, and both are
//! bounded by the maximum directory size, so a chain always ends: either the
//! key lands or the directory runs out of room.

use crate::{
    config::HybridConfig,
    directory::Directory,
    error::Result,
    hash::{KeyHasher, MixHasher, Side},
    iter::{Buckets, Keys},
    set::KeySet,
    stats::{Counters, Stats},
};

/// One eviction in a displacement chain
#[derive(Debug, Clone, Copy)]
struct Eviction {
    side: Side,
    placed: u64,
    evicted: u64,
}

/// Hash set of two extendible directories linked by cuckoo displacement
pub struct HybridSet<H = MixHasher> {
    directories: [Directory; 2],
    max_chain: usize,
    hasher: H,
    counters: Counters,
}

impl HybridSet<MixHasher> {
    /// Create an empty `HybridSet` with the default configuration
    pub fn new() -> Self {
        Self::build(HybridConfig::default(), MixHasher::new())
    }

    pub fn with_config(config: HybridConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, MixHasher::new())
    }
}

impl<H> HybridSet<H> {
    fn build(config: HybridConfig, hasher: H) -> Self {
        let depth = config.initial_depth();
        Self {
            directories: [
                Directory::with_depth(depth, 1, config.max_capacity),
                Directory::with_depth(depth, 1, config.max_capacity),
            ],
            max_chain: config.max_chain,
            hasher,
            counters: Counters::default(),
        }
    }

    #[inline]
    fn directory(&self, side: Side) -> &Directory {
        &self.directories[side.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directories.iter().map(Directory::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys held by one directory
    #[inline]
    pub fn side_len(&self, side: Side) -> usize {
        self.directory(side).len()
    }

    #[inline]
    pub fn global_depth(&self, side: Side) -> u8 {
        self.directory(side).global_depth()
    }

    #[inline]
    pub fn directory_size(&self, side: Side) -> usize {
        self.directory(side).size()
    }

    /// Distinct buckets across both directories
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.directories.iter().map(Directory::bucket_count).sum()
    }

    /// One key per bucket
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bucket_count()
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Each physical bucket of one directory once, in order of first address
    pub fn buckets(&self, side: Side) -> Buckets<'_> {
        Buckets::new(self.directory(side).buckets())
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.directories.iter().flat_map(Directory::keys))
    }

    pub fn stats(&self) -> Stats {
        let [first, second] = &self.directories;
        Stats {
            len: self.len(),
            capacity: self.capacity(),
            buckets: self.bucket_count(),
            counters: self
                .counters
                .merge(first.counters())
                .merge(second.counters()),
        }
    }
}

impl<H: KeyHasher> HybridSet<H> {
    /// Create an empty `HybridSet` with provided configuration and hasher
    pub fn with_config_and_hasher(config: HybridConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    /// Which directory holds `key`, if any
    pub fn locate(&self, key: u64) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.directory(side).contains(self.hasher.hash(side, key), key))
    }

    /// Return `true` if either addressed bucket holds `key`
    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        self.locate(key).is_some()
    }

    /// Insert `key`, displacing residents and splitting contended buckets
    ///
    /// Returns `Ok(false)` without changing anything if `key` is present.
    /// On `Err` every displacement has been undone and the set holds exactly
    /// the keys it held before the call.
    pub fn try_insert(&mut self, key: u64) -> Result<bool> {
        if self.contains(key) {
            return Ok(false);
        }

        // ties go to the first directory
        let side = if self.side_len(Side::Second) < self.side_len(Side::First) {
            Side::Second
        } else {
            Side::First
        };

        self.displace(side, key)?;
        Ok(true)
    }

    /// Insert `key`; capacity exhaustion is logged and reported as `false`
    pub fn insert(&mut self, key: u64) -> bool {
        KeySet::insert(self, key)
    }

    fn displace(&mut self, start: Side, key: u64) -> Result<()> {
        let mut chain: Vec<Eviction> = Vec::new();
        let mut since_split = 0;
        let mut side = start;
        let mut key = key;

        loop {
            let hash = self.hasher.hash(side, key);
            let directory = &mut self.directories[side.index()];

            if since_split > self.max_chain && directory.bucket(hash).is_full() {
                let hasher = &self.hasher;
                if let Err(err) = directory.split(hash, |k| hasher.hash(side, k)) {
                    self.unwind(&chain);
                    return Err(err);
                }
                since_split = 0;
                // re-address: the directory may have doubled
                continue;
            }

            match directory.place_or_evict(hash, key) {
                None => return Ok(()),
                Some(evicted) => {
                    if chain.is_empty() {
                        self.counters.collisions += 1;
                    }
                    self.counters.displacements += 1;
                    chain.push(Eviction {
                        side,
                        placed: key,
                        evicted,
                    });
                    since_split += 1;
                    key = evicted;
                    side = side.other();
                }
            }
        }
    }

    /// Reverse a displacement chain, newest eviction first
    ///
    /// Splits made along the way are kept; they only refine buckets, so each
    /// evicted key finds its bucket empty again once the key that took its
    /// place is removed.
    fn unwind(&mut self, chain: &[Eviction]) {
        for step in chain.iter().rev() {
            let placed_hash = self.hasher.hash(step.side, step.placed);
            let evicted_hash = self.hasher.hash(step.side, step.evicted);
            let directory = &mut self.directories[step.side.index()];

            let removed = directory.remove(placed_hash, step.placed);
            debug_assert!(removed, "unwound key missing");
            let displaced = directory.place_or_evict(evicted_hash, step.evicted);
            debug_assert!(displaced.is_none(), "unwound bucket occupied");
        }
        tracing::debug!(steps = chain.len(), "unwound displacement chain");
    }
}

impl<H: KeyHasher> KeySet for HybridSet<H> {
    fn try_insert(&mut self, key: u64) -> Result<bool> {
        HybridSet::try_insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        HybridSet::contains(self, key)
    }

    fn len(&self) -> usize {
        HybridSet::len(self)
    }

    fn capacity(&self) -> usize {
        HybridSet::capacity(self)
    }

    fn stats(&self) -> Stats {
        HybridSet::stats(self)
    }

    fn keys(&self) -> Keys<'_> {
        HybridSet::keys(self)
    }
}

impl Default for HybridSet<MixHasher> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
