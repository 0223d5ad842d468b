use crate::{
    bucket::Bucket,
    error::{self, Result},
    hash::low_bits,
    stats::Counters,
};

/// Extendible hashing directory over an arena of buckets
pub(crate) struct Directory {
    /// Bucket storage (owns buckets)
    buckets: Vec<Bucket>,

    /// Directory mapping low hash bits to bucket indices
    slots: Vec<usize>,

    /// Global depth (slots.len() == 2^global_depth)
    global_depth: u8,

    /// Keys each bucket can hold
    bucket_capacity: usize,

    /// Largest allowed `slots.len()`
    max_size: usize,

    /// Total keys across all buckets
    len: usize,

    counters: Counters,
}

impl Directory {
    /// Create a directory of `2^initial_depth` entries, one bucket each
    pub fn with_depth(initial_depth: u8, bucket_capacity: usize, max_size: usize) -> Self {
        let dir_size = 1usize << initial_depth;
        let buckets = (0..dir_size)
            .map(|i| Bucket::new(i, initial_depth, bucket_capacity))
            .collect();

        Self {
            buckets,
            slots: (0..dir_size).collect(),
            global_depth: initial_depth,
            bucket_capacity,
            max_size,
            len: 0,
            counters: Counters::default(),
        }
    }

    /// Number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of unique buckets
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    #[inline]
    pub fn global_depth(&self) -> u8 {
        self.global_depth
    }

    /// Number of directory entries
    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Compute directory index from hash (uses LOW bits)
    #[inline]
    pub fn address(&self, hash: u64) -> usize {
        low_bits(self.global_depth, hash)
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        self.slots[self.address(hash)]
    }

    /// Get the bucket a hash addresses
    #[inline]
    pub fn bucket(&self, hash: u64) -> &Bucket {
        &self.buckets[self.bucket_index(hash)]
    }

    #[inline]
    pub fn contains(&self, hash: u64, key: u64) -> bool {
        self.bucket(hash).contains(key)
    }

    /// Append `key` to its bucket
    ///
    /// Returns `Err(key)` if the bucket is full (needs splitting)
    pub fn try_push(&mut self, hash: u64, key: u64) -> std::result::Result<(), u64> {
        let idx = self.bucket_index(hash);
        self.buckets[idx].push(key)?;
        self.len += 1;
        Ok(())
    }

    /// Place `key` in its bucket, evicting the oldest resident if the bucket
    /// is full
    pub fn place_or_evict(&mut self, hash: u64, key: u64) -> Option<u64> {
        let idx = self.bucket_index(hash);
        match self.buckets[idx].push(key) {
            Ok(()) => {
                self.len += 1;
                None
            }
            Err(key) => self.buckets[idx].replace_oldest(key),
        }
    }

    pub fn remove(&mut self, hash: u64, key: u64) -> bool {
        let idx = self.bucket_index(hash);
        let removed = self.buckets[idx].remove(key);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Double the directory size
    fn grow_directory(&mut self) -> Result<()> {
        // Addresses are low bits, so the new top bit selects the half:
        // [A, B] -> [A, B, A, B]. Every alias of a bucket keeps agreeing on
        // its low local-depth bits.
        let new_size = error::doubled(self.slots.len(), self.max_size)?;
        self.slots.extend_from_within(..);
        debug_assert_eq!(self.slots.len(), new_size);

        self.global_depth += 1;
        self.counters.growths += 1;
        tracing::debug!(
            global_depth = self.global_depth,
            size = new_size,
            "doubled directory"
        );
        Ok(())
    }

    /// Split the bucket `hash` addresses and update the directory
    ///
    /// The bucket's keys are redistributed between it and its new sibling by
    /// `hash_fn`. Fails, leaving the directory untouched, if the directory
    /// would have to grow past its maximum size.
    pub fn split<F>(&mut self, hash: u64, hash_fn: F) -> Result<()>
    where
        F: Fn(u64) -> u64,
    {
        let bucket_idx = self.bucket_index(hash);
        let depth = self.buckets[bucket_idx].local_depth();

        if depth >= self.global_depth {
            self.grow_directory()?;
        }

        // sibling's first address is the old one with a 1 at bit `depth`
        let new_depth = depth + 1;
        let first_address = self.buckets[bucket_idx].first_address();
        let sibling_first = first_address | (1usize << depth);

        self.buckets[bucket_idx].set_local_depth(new_depth);
        let sibling_idx = self.buckets.len();
        self.buckets
            .push(Bucket::new(sibling_first, new_depth, self.bucket_capacity));

        // redirect every entry whose low `new_depth` bits match the sibling
        let stride = 1usize << new_depth;
        for slot in (sibling_first..self.slots.len()).step_by(stride) {
            debug_assert_eq!(self.slots[slot], bucket_idx);
            self.slots[slot] = sibling_idx;
        }

        // filter the keys back into whichever half they now address
        for key in self.buckets[bucket_idx].take_keys() {
            let idx = self.bucket_index(hash_fn(key));
            let pushed = self.buckets[idx].push(key);
            debug_assert!(pushed.is_ok(), "split half full during redistribution");
        }

        self.counters.splits += 1;
        tracing::debug!(
            first_address,
            sibling = sibling_first,
            local_depth = new_depth,
            "split bucket"
        );
        Ok(())
    }

    /// Iterate over each physical bucket once, by its first address
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, &idx)| (i, &self.buckets[idx]))
            .filter(|(i, bucket)| bucket.first_address() == *i)
            .map(|(_, bucket)| bucket)
    }

    /// Iterate over all keys
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().flat_map(|b| b.keys().iter().copied())
    }

    /// Assert the aliasing and depth invariants
    #[cfg(test)]
    pub fn check_invariants<F>(&self, hash_fn: F)
    where
        F: Fn(u64) -> u64,
    {
        assert_eq!(self.slots.len(), 1usize << self.global_depth);

        let mut referenced = vec![false; self.buckets.len()];
        for (i, &idx) in self.slots.iter().enumerate() {
            let bucket = &self.buckets[idx];
            referenced[idx] = true;
            assert!(bucket.local_depth() <= self.global_depth);
            assert_eq!(
                bucket.first_address(),
                low_bits(bucket.local_depth(), i as u64),
                "entry {} disagrees with bucket {}",
                i,
                bucket.first_address()
            );
            assert_eq!(self.slots[bucket.first_address()], idx);
        }
        assert!(referenced.iter().all(|&r| r), "orphaned bucket");

        let mut total = 0;
        for bucket in &self.buckets {
            assert!(bucket.len() <= self.bucket_capacity);
            for &key in bucket.keys() {
                assert_eq!(
                    low_bits(bucket.local_depth(), hash_fn(key)),
                    bucket.first_address(),
                    "key {} in wrong bucket",
                    key
                );
            }
            total += bucket.len();
        }
        assert_eq!(total, self.len);
        assert_eq!(self.buckets().count(), self.buckets.len());
    }
}
