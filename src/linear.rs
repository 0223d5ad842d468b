//! Open-addressed set with linear probing.
//!
//! - Home slot `h1(key) mod size`, stride 1, wrapping
//! - A probe stops at an empty slot, at the key, or after visiting every slot
//! - Only a completely full table grows: the array doubles and every key is
//!   re-placed in ascending order of its old address

use crate::{
    config::LinearConfig,
    error::{self, Result},
    hash::{KeyHasher, MixHasher},
    iter::{Keys, Slots},
    set::KeySet,
    stats::{Counters, Stats},
};

/// How many slots to advance at a time while looking for a free slot
const STEP_SIZE: usize = 1;

/// Outcome of probing for a key
enum Probe {
    Present,
    Vacant { address: usize, steps: usize },
    Full,
}

/// Hash set resolving collisions by linear probing
pub struct LinearSet<H = MixHasher> {
    slots: Vec<Option<u64>>,
    len: usize,
    max_capacity: usize,
    hasher: H,
    counters: Counters,
}

impl LinearSet<MixHasher> {
    /// Create an empty `LinearSet` with the default configuration
    pub fn new() -> Self {
        Self::build(LinearConfig::default(), MixHasher::new())
    }

    pub fn with_config(config: LinearConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, MixHasher::new())
    }
}

impl<H> LinearSet<H> {
    fn build(config: LinearConfig, hasher: H) -> Self {
        Self {
            slots: vec![None; config.initial_size],
            len: 0,
            max_capacity: config.max_capacity,
            hasher,
            counters: Counters::default(),
        }
    }

    /// Returns the number of keys in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Occupied slots as `(address, key)`, in address order
    pub fn slots(&self) -> Slots<'_> {
        Slots::new(&self.slots)
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.slots.iter().flatten().copied())
    }

    pub fn stats(&self) -> Stats {
        Stats {
            len: self.len,
            capacity: self.slots.len(),
            buckets: self.slots.len(),
            counters: self.counters,
        }
    }
}

impl<H: KeyHasher> LinearSet<H> {
    /// Create an empty `LinearSet` with provided configuration and hasher
    pub fn with_config_and_hasher(config: LinearConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    #[inline]
    fn home(&self, key: u64, size: usize) -> usize {
        (self.hasher.h1(key) % size as u64) as usize
    }

    /// Step from the home slot until the key, a free slot, or a full lap
    fn probe(&self, key: u64) -> Probe {
        let size = self.slots.len();
        let mut address = self.home(key, size);

        for steps in 0..size {
            match self.slots[address] {
                None => return Probe::Vacant { address, steps },
                Some(k) if k == key => return Probe::Present,
                Some(_) => address = (address + STEP_SIZE) % size,
            }
        }

        Probe::Full
    }

    /// Return `true` if the set contains `key`
    pub fn contains(&self, key: u64) -> bool {
        matches!(self.probe(key), Probe::Present)
    }

    /// Insert `key`, doubling the table if every slot is taken
    ///
    /// Returns `Ok(false)` without changing anything if `key` is present.
    pub fn try_insert(&mut self, key: u64) -> Result<bool> {
        loop {
            match self.probe(key) {
                Probe::Present => return Ok(false),
                Probe::Vacant { address, steps } => {
                    if steps > 0 {
                        self.counters.collisions += 1;
                        self.counters.probes += steps as u64;
                    }
                    self.slots[address] = Some(key);
                    self.len += 1;
                    return Ok(true);
                }
                Probe::Full => self.grow()?,
            }
        }
    }

    /// Insert `key`; capacity exhaustion is logged and reported as `false`
    pub fn insert(&mut self, key: u64) -> bool {
        KeySet::insert(self, key)
    }

    /// Double the table and re-place every key
    fn grow(&mut self) -> Result<()> {
        let new_size = error::doubled(self.slots.len(), self.max_capacity)?;
        let old = std::mem::replace(&mut self.slots, vec![None; new_size]);

        // old slots are visited in ascending address order
        for key in old.into_iter().flatten() {
            let mut address = self.home(key, new_size);
            while self.slots[address].is_some() {
                address = (address + STEP_SIZE) % new_size;
            }
            self.slots[address] = Some(key);
        }

        self.counters.growths += 1;
        tracing::debug!(size = new_size, len = self.len, "doubled linear table");
        Ok(())
    }
}

impl<H: KeyHasher> KeySet for LinearSet<H> {
    fn try_insert(&mut self, key: u64) -> Result<bool> {
        LinearSet::try_insert(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        LinearSet::contains(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        LinearSet::capacity(self)
    }

    fn stats(&self) -> Stats {
        LinearSet::stats(self)
    }

    fn keys(&self) -> Keys<'_> {
        LinearSet::keys(self)
    }
}

impl Default for LinearSet<MixHasher> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
