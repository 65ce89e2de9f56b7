//! Directory of bucket references.
//!
//! Buckets live in an arena (`buckets`) and directory slots store arena
//! indices, so several slots can alias one bucket without sharing pointers.
//! Buckets are only ever appended; the arena index of a bucket never changes.

use parking_lot::RwLock;

use crate::common::{Error, Result};
use crate::hash::bucket::{low_bits, Bucket};
use crate::hash::DirectorySnapshot;

/// Outcome of a structural insert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitReport {
    /// Whether the key was new (as opposed to overwritten).
    pub(crate) added: bool,
    pub(crate) splits: u32,
    pub(crate) doublings: u32,
}

#[derive(Debug)]
pub(crate) struct Directory<K, V> {
    global_depth: u32,

    /// `slots[i]` is the arena index of the bucket for hashes whose low
    /// `global_depth` bits equal `i`. Always `2^global_depth` long.
    slots: Vec<usize>,

    buckets: Vec<RwLock<Bucket<K, V>>>,
}

impl<K: Eq, V> Directory<K, V> {
    /// A single empty bucket at depth 0.
    pub(crate) fn new(bucket_capacity: usize) -> Self {
        Self {
            global_depth: 0,
            slots: vec![0],
            buckets: vec![RwLock::new(Bucket::new(0, bucket_capacity))],
        }
    }

    #[inline]
    pub(crate) fn global_depth(&self) -> u32 {
        self.global_depth
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn slot_of(&self, hash: u64) -> usize {
        (hash & low_bits(self.global_depth)) as usize
    }

    /// Bucket that a key with `hash` routes to.
    #[inline]
    pub(crate) fn bucket_for(&self, hash: u64) -> &RwLock<Bucket<K, V>> {
        &self.buckets[self.slots[self.slot_of(hash)]]
    }

    pub(crate) fn local_depth(&self, index: usize) -> Result<u32> {
        let bucket_id = self.slots.get(index).ok_or(Error::InvalidIndex {
            index,
            len: self.slots.len(),
        })?;
        Ok(self.buckets[*bucket_id].read().local_depth())
    }

    /// Insert with exclusive access, splitting as often as needed.
    ///
    /// Checks up front how deep the target bucket must become; if that is
    /// beyond `max_depth` nothing is touched and `DepthExceeded` is returned.
    pub(crate) fn insert(
        &mut self,
        key: K,
        value: V,
        hash: u64,
        max_depth: u32,
    ) -> Result<SplitReport> {
        let target = self.slots[self.slot_of(hash)];
        let bucket = self.buckets[target].get_mut();

        if bucket.get(&key, hash).is_none() {
            match bucket.depth_needed(hash) {
                Some(depth) if depth <= max_depth => {}
                _ => return Err(Error::DepthExceeded { max_depth }),
            }
        }

        let mut report = SplitReport::default();
        let (mut key, mut value) = (key, value);
        loop {
            let target = self.slots[self.slot_of(hash)];
            match self.buckets[target].get_mut().insert(key, value, hash) {
                Ok(added) => {
                    report.added = added;
                    return Ok(report);
                }
                Err((k, v)) => {
                    key = k;
                    value = v;
                }
            }
            if self.split(target) {
                report.doublings += 1;
            }
            report.splits += 1;
        }
    }

    /// Split bucket `bucket_id`, doubling the directory first if the bucket
    /// is already as deep as the directory. Returns whether it doubled.
    fn split(&mut self, bucket_id: usize) -> bool {
        let sibling = self.buckets[bucket_id].get_mut().split();
        let depth = sibling.local_depth();

        let doubled = depth > self.global_depth;
        if doubled {
            self.double();
        }

        let sibling_id = self.buckets.len();
        self.buckets.push(RwLock::new(sibling));

        let high_bit = 1usize << (depth - 1);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if *slot == bucket_id && index & high_bit != 0 {
                *slot = sibling_id;
            }
        }

        log::trace!(
            "split bucket {bucket_id} into {bucket_id}/{sibling_id} at local depth {depth}"
        );
        doubled
    }

    /// Slot `i + 2^global_depth` starts out aliasing slot `i`.
    fn double(&mut self) {
        self.slots.extend_from_within(..);
        self.global_depth += 1;
        log::debug!(
            "doubled directory to {} slots (global depth {})",
            self.slots.len(),
            self.global_depth
        );
    }

    pub(crate) fn snapshot(&self) -> DirectorySnapshot {
        let (local_depths, entry_hashes): (Vec<u32>, Vec<Vec<u64>>) = self
            .buckets
            .iter()
            .map(|bucket| {
                let bucket = bucket.read();
                (bucket.local_depth(), bucket.hashes().collect::<Vec<_>>())
            })
            .unzip();

        DirectorySnapshot {
            global_depth: self.global_depth,
            slots: self.slots.clone(),
            local_depths,
            entry_hashes,
        }
    }
}
