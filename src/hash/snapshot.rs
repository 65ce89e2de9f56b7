//! Point-in-time view of the directory layout.

use std::fmt;

use crate::hash::bucket::low_bits;

/// A consistent copy of the directory's shape, taken under the table lock.
///
/// Buckets are identified by their position in `local_depths` (bucket ids are
/// stable for the life of the table). Mostly useful for diagnostics and for
/// checking the structural invariants in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub global_depth: u32,

    /// Bucket id referenced by each directory slot.
    pub slots: Vec<usize>,

    /// Local depth of each bucket, indexed by bucket id.
    pub local_depths: Vec<u32>,

    /// Hashes of the entries stored in each bucket, indexed by bucket id.
    pub entry_hashes: Vec<Vec<u64>>,
}

impl DirectorySnapshot {
    /// Number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.local_depths.len()
    }

    /// Number of entries across all buckets.
    pub fn num_entries(&self) -> usize {
        self.entry_hashes.iter().map(Vec::len).sum()
    }

    /// How many directory slots point at `bucket_id`.
    pub fn aliases(&self, bucket_id: usize) -> usize {
        self.slots.iter().filter(|&&id| id == bucket_id).count()
    }

    /// Verify the structural invariants, describing the first violation.
    ///
    /// - the directory has `2^global_depth` slots
    /// - no bucket is deeper than the directory
    /// - a bucket at depth `d` is referenced by `2^(global_depth - d)` slots
    /// - every slot agrees with its bucket on the bucket's low `d` bits
    /// - every entry agrees with its bucket's slots on those bits
    pub fn check(&self) -> Result<(), String> {
        if self.slots.len() != 1usize << self.global_depth {
            return Err(format!(
                "directory has {} slots at global depth {}",
                self.slots.len(),
                self.global_depth
            ));
        }

        for (bucket_id, &depth) in self.local_depths.iter().enumerate() {
            if depth > self.global_depth {
                return Err(format!(
                    "bucket {bucket_id} has local depth {depth} > global depth {}",
                    self.global_depth
                ));
            }

            let expected = 1usize << (self.global_depth - depth);
            let actual = self.aliases(bucket_id);
            if actual != expected {
                return Err(format!(
                    "bucket {bucket_id} at depth {depth} is referenced by {actual} slots, expected {expected}"
                ));
            }
        }

        for (index, &bucket_id) in self.slots.iter().enumerate() {
            let Some(&depth) = self.local_depths.get(bucket_id) else {
                return Err(format!("slot {index} references missing bucket {bucket_id}"));
            };
            let mask = low_bits(depth);
            let prefix = index as u64 & mask;

            if let Some(hash) = self.entry_hashes[bucket_id]
                .iter()
                .find(|&&hash| hash & mask != prefix)
            {
                return Err(format!(
                    "bucket {bucket_id} holds hash {hash:#x} not routed by slot {index}"
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for DirectorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Directory {{ global_depth: {}, buckets: {}, entries: {} }}",
            self.global_depth,
            self.num_buckets(),
            self.num_entries()
        )?;
        let width = self.global_depth as usize;
        for (index, &bucket_id) in self.slots.iter().enumerate() {
            writeln!(
                f,
                "  {index:0width$b} -> bucket {bucket_id} (depth {}, {} entries)",
                self.local_depths[bucket_id],
                self.entry_hashes[bucket_id].len()
            )?;
        }
        Ok(())
    }
}
