//! Read-only statistics snapshots
//!
//! Sets bump their `Counters` as a side channel while inserting and never
//! read them back; `Stats` is what reporting code consumes.

/// Event counts accumulated over the lifetime of a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Inserts whose first probe found its slot or bucket taken
    pub collisions: u64,
    /// Extra probe steps taken by linear probing inserts
    pub probes: u64,
    /// Keys evicted by cuckoo displacement
    pub displacements: u64,
    /// Whole-table doublings, rehashes and directory doublings
    pub growths: u64,
    /// Bucket splits
    pub splits: u64,
}

impl Counters {
    /// Mean extra probes per colliding insert
    pub fn average_probe_len(&self) -> f64 {
        if self.collisions == 0 {
            0.0
        } else {
            self.probes as f64 / self.collisions as f64
        }
    }

    pub(crate) fn merge(&self, other: &Counters) -> Counters {
        Counters {
            collisions: self.collisions + other.collisions,
            probes: self.probes + other.probes,
            displacements: self.displacements + other.displacements,
            growths: self.growths + other.growths,
            splits: self.splits + other.splits,
        }
    }
}

/// Point-in-time view of a set's shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Keys stored
    pub len: usize,
    /// Keys the current storage can hold without growing
    pub capacity: usize,
    /// Physical slots or buckets
    pub buckets: usize,
    pub counters: Counters,
}

impl Stats {
    /// Get load factor (0.0 to 1.0)
    #[inline]
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.len as f64 / self.capacity as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_factor() {
        let stats = Stats {
            len: 3,
            capacity: 4,
            buckets: 4,
            counters: Counters::default(),
        };
        assert!((stats.load_factor() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_probe_len() {
        let counters = Counters {
            collisions: 4,
            probes: 10,
            ..Counters::default()
        };
        assert!((counters.average_probe_len() - 2.5).abs() < f64::EPSILON);
        assert_eq!(Counters::default().average_probe_len(), 0.0);
    }

    #[test]
    fn test_merge() {
        let a = Counters {
            collisions: 1,
            displacements: 2,
            splits: 3,
            ..Counters::default()
        };
        let b = Counters {
            collisions: 10,
            growths: 1,
            ..Counters::default()
        };
        let merged = a.merge(&b);
        assert_eq!(merged.collisions, 11);
        assert_eq!(merged.displacements, 2);
        assert_eq!(merged.growths, 1);
        assert_eq!(merged.splits, 3);
    }
}
