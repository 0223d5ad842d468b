//! Cuckoo hashing over two flat tables.
//!
//! - Table A is addressed by `h1(key) mod size`, table B by `h2(key) mod size`
//! - Lookup probes exactly two slots
//! - Insert evicts residents along a chain that alternates tables, starting
//!   with A
//! - A chain longer than `max_chain` is rolled back and both tables are
//!   rebuilt at double the size before the insert is retried

use crate::{
    config::CuckooConfig,
    error::{self, Result},
    hash::{KeyHasher, MixHasher, Side},
    iter::{Keys, Slots},
    set::KeySet,
    stats::{Counters, Stats},
};

/// One eviction in a displacement chain
#[derive(Debug, Clone, Copy)]
struct Eviction {
    side: Side,
    address: usize,
    evicted: u64,
}

/// The two equally sized tables
struct Tables {
    slots: [Vec<Option<u64>>; 2],
    size: usize,
}

impl Tables {
    fn new(size: usize) -> Self {
        Self {
            slots: [vec![None; size], vec![None; size]],
            size,
        }
    }

    #[inline]
    fn address<H: KeyHasher>(&self, hasher: &H, side: Side, key: u64) -> usize {
        (hasher.hash(side, key) % self.size as u64) as usize
    }

    #[inline]
    fn contains<H: KeyHasher>(&self, hasher: &H, key: u64) -> bool {
        Side::BOTH
            .iter()
            .any(|&side| self.slots[side.index()][self.address(hasher, side, key)] == Some(key))
    }

    fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().flat_map(|t| t.iter().flatten().copied())
    }

    /// Run a displacement chain for `key`, which must not be present
    ///
    /// Returns `false` if the chain grew past `max_chain`; every eviction
    /// has then been undone and `key` is not stored.
    fn displace<H: KeyHasher>(
        &mut self,
        hasher: &H,
        key: u64,
        max_chain: usize,
        counters: &mut Counters,
    ) -> bool {
        let mut chain: Vec<Eviction> = Vec::new();
        let mut side = Side::First;
        let mut key = key;

        loop {
            let address = self.address(hasher, side, key);
            let slot = &mut self.slots[side.index()][address];

            match slot.replace(key) {
                None => return true,
                Some(evicted) => {
                    if chain.is_empty() {
                        counters.collisions += 1;
                    }
                    counters.displacements += 1;
                    chain.push(Eviction {
                        side,
                        address,
                        evicted,
                    });
                    key = evicted;
                    side = side.other();
                }
            }

            if chain.len() > max_chain {
                // restore each slot to what it held before its eviction
                for step in chain.iter().rev() {
                    self.slots[step.side.index()][step.address] = Some(step.evicted);
                }
                return false;
            }
        }
    }
}

/// Hash set resolving collisions with two tables and cuckoo displacement
pub struct CuckooSet<H = MixHasher> {
    tables: Tables,
    len: usize,
    max_capacity: usize,
    max_chain: usize,
    hasher: H,
    counters: Counters,
}

impl CuckooSet<MixHasher> {
    /// Create an empty `CuckooSet` with the default configuration
    pub fn new() -> Self {
        Self::build(CuckooConfig::default(), MixHasher::new())
    }

    pub fn with_config(config: CuckooConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, MixHasher::new())
    }
}

impl<H> CuckooSet<H> {
    fn build(config: CuckooConfig, hasher: H) -> Self {
        Self {
            tables: Tables::new(config.initial_size),
            len: 0,
            max_capacity: config.max_capacity,
            max_chain: config.max_chain,
            hasher,
            counters: Counters::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots in each of the two tables
    #[inline]
    pub fn table_size(&self) -> usize {
        self.tables.size
    }

    /// Slots across both tables
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tables.size * 2
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Occupied slots of one table as `(address, key)`
    pub fn slots(&self, side: Side) -> Slots<'_> {
        Slots::new(&self.tables.slots[side.index()])
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.tables.keys())
    }

    pub fn stats(&self) -> Stats {
        Stats {
            len: self.len,
            capacity: self.capacity(),
            buckets: self.capacity(),
            counters: self.counters,
        }
    }
}

impl<H: KeyHasher> CuckooSet<H> {
    /// Create an empty `CuckooSet` with provided configuration and hasher
    pub fn with_config_and_hasher(config: CuckooConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    /// Return `true` if either table holds `key` at its address
    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        self.tables.contains(&self.hasher, key)
    }

    /// Insert `key`, rehashing into larger tables when a chain stalls
    ///
    /// Returns `Ok(false)` without changing anything if `key` is present.
    /// On `Err` the set holds exactly the keys it held before the call.
    pub fn try_insert(&mut self, key: u64) -> Result<bool> {
        if self.contains(key) {
            return Ok(false);
        }

        while !self
            .tables
            .displace(&self.hasher, key, self.max_chain, &mut self.counters)
        {
            self.rehash()?;
        }

        self.len += 1;
        Ok(true)
    }

    /// Insert `key`; capacity exhaustion is logged and reported as `false`
    pub fn insert(&mut self, key: u64) -> bool {
        KeySet::insert(self, key)
    }

    /// Rebuild both tables at double the size
    ///
    /// If a chain stalls while rebuilding, the fresh tables are dropped and
    /// the rebuild starts over one doubling larger. The old tables are only
    /// replaced once every key has been placed.
    fn rehash(&mut self) -> Result<()> {
        let mut size = self.tables.size;

        'grow: loop {
            size = error::doubled(size, self.max_capacity)?;
            let mut fresh = Tables::new(size);

            for key in self.tables.keys() {
                if !fresh.displace(&self.hasher, key, self.max_chain, &mut self.counters) {
                    tracing::debug!(size, "chain stalled while rehashing");
                    continue 'grow;
                }
            }

            self.tables = fresh;
            self.counters.growths += 1;
            tracing::debug!(size, len = self.len, "rehashed cuckoo tables");
            return Ok(());
        }
    }
}

impl<H: KeyHasher> KeySet for CuckooSet<H> {
    fn try_insert(&mut self, key: u64) -> Result<bool> {
        CuckooSet::try_insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        CuckooSet::contains(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        CuckooSet::capacity(self)
    }

    fn stats(&self) -> Stats {
        CuckooSet::stats(self)
    }

    fn keys(&self) -> Keys<'_> {
        CuckooSet::keys(self)
    }
}

impl Default for CuckooSet<MixHasher> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
