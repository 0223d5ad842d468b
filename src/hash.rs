//! The two hash functions every set addresses keys with.
//!
//! - `h1` addresses the linear table, cuckoo table A, the extendible directory
//!   and hybrid directory 1
//! - `h2` addresses cuckoo table B and hybrid directory 2
//! - The sets only need `h1` and `h2` to be deterministic and to rarely
//!   collide on the same pair of keys at once

/// One of the two tables (or directories) of a two-sided set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Addressed by `h1`
    First,
    /// Addressed by `h2`
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// The table a displaced key moves to
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Supplies the pair of hash functions a set addresses keys with
pub trait KeyHasher {
    fn h1(&self, key: u64) -> u64;

    fn h2(&self, key: u64) -> u64;

    /// Hash `key` with the function belonging to `side`
    #[inline]
    fn hash(&self, side: Side, key: u64) -> u64 {
        match side {
            Side::First => self.h1(key),
            Side::Second => self.h2(key),
        }
    }
}

impl<H: KeyHasher + ?Sized> KeyHasher for &H {
    #[inline]
    fn h1(&self, key: u64) -> u64 {
        (**self).h1(key)
    }

    #[inline]
    fn h2(&self, key: u64) -> u64 {
        (**self).h2(key)
    }
}

/// Default hasher: two unrelated 64-bit finalizers over a seeded key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixHasher {
    seed: u64,
}

impl MixHasher {
    const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

    #[inline]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    #[inline]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[inline]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    // splitmix64 finalizer
    #[inline]
    const fn splitmix(mut z: u64) -> u64 {
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    // murmur3 fmix64
    #[inline]
    const fn fmix(mut k: u64) -> u64 {
        k ^= k >> 33;
        k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
        k ^= k >> 33;
        k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        k ^ (k >> 33)
    }
}

impl KeyHasher for MixHasher {
    #[inline]
    fn h1(&self, key: u64) -> u64 {
        Self::splitmix(key.wrapping_add(self.seed).wrapping_add(Self::GOLDEN))
    }

    #[inline]
    fn h2(&self, key: u64) -> u64 {
        Self::fmix(key ^ self.seed.rotate_left(29) ^ Self::GOLDEN.rotate_left(17))
    }
}

/// Mask selecting the low `depth` bits of a hash
#[inline]
pub(crate) fn low_bits(depth: u8, hash: u64) -> usize {
    let mask = 1u64
        .checked_shl(depth as u32)
        .map_or(u64::MAX, |bit| bit - 1);
    (hash & mask) as usize
}
