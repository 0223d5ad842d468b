//! Iterators over the contents of a set

use crate::{
    bucket::Bucket, cuckoo::CuckooSet, extendible::ExtendibleSet, hash::KeyHasher,
    hybrid::HybridSet, linear::LinearSet,
};

/// An iterator over the keys stored in a set
pub struct Keys<'a> {
    inner: Box<dyn Iterator<Item = u64> + 'a>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = u64> + 'a,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An iterator over the occupied slots of a flat table, as `(address, key)`
pub struct Slots<'a> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Option<u64>>>,
}

impl<'a> Slots<'a> {
    pub(crate) fn new(slots: &'a [Option<u64>]) -> Self {
        Self {
            inner: slots.iter().enumerate(),
        }
    }
}

impl<'a> Iterator for Slots<'a> {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find_map(|(address, slot)| slot.map(|key| (address, key)))
    }
}

/// An iterator over the physical buckets of an extendible directory
pub struct Buckets<'a> {
    inner: Box<dyn Iterator<Item = &'a Bucket> + 'a>,
}

impl<'a> Buckets<'a> {
    pub(crate) fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Bucket> + 'a,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl<'a> Iterator for Buckets<'a> {
    type Item = &'a Bucket;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a LinearSet<H> {
    type Item = u64;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a CuckooSet<H> {
    type Item = u64;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a ExtendibleSet<H> {
    type Item = u64;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a HybridSet<H> {
    type Item = u64;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}
