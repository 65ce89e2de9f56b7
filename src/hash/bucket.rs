//! Bounded key/value bucket with a local depth.

/// A stored pair plus its cached hash, so splits never rehash.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

/// Mask selecting the low `depth` bits of a hash.
#[inline]
pub(crate) fn low_bits(depth: u32) -> u64 {
    if depth >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << depth) - 1
    }
}

/// A bucket holds at most `capacity` entries.
///
/// Every entry agrees on the low `local_depth` bits of its hash; those bits
/// are what route a lookup here from the directory.
#[derive(Debug)]
pub(crate) struct Bucket<K, V> {
    local_depth: u32,
    capacity: usize,
    entries: Vec<Entry<K, V>>,
}

impl<K: Eq, V> Bucket<K, V> {
    pub(crate) fn new(local_depth: u32, capacity: usize) -> Self {
        Self {
            local_depth,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn local_depth(&self) -> u32 {
        self.local_depth
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub(crate) fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|e| e.hash)
    }

    fn position(&self, key: &K, hash: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key == *key)
    }

    pub(crate) fn get(&self, key: &K, hash: u64) -> Option<&V> {
        self.position(key, hash).map(|i| &self.entries[i].value)
    }

    /// Insert or overwrite.
    ///
    /// Returns `Ok(true)` if a new entry was added, `Ok(false)` if an existing
    /// value was replaced, and hands the pair back if the bucket is full.
    pub(crate) fn insert(&mut self, key: K, value: V, hash: u64) -> Result<bool, (K, V)> {
        if let Some(i) = self.position(&key, hash) {
            self.entries[i].value = value;
            return Ok(false);
        }
        if self.is_full() {
            return Err((key, value));
        }
        self.entries.push(Entry { hash, key, value });
        Ok(true)
    }

    pub(crate) fn remove(&mut self, key: &K, hash: u64) -> Option<V> {
        let i = self.position(key, hash)?;
        Some(self.entries.swap_remove(i).value)
    }

    /// Smallest local depth at which a key with `hash` would find room.
    ///
    /// Counts how many current entries share the key's low bits at each
    /// depth, starting from this bucket's own. `None` means even all
    /// [`HASH_BITS`](crate::common::config::HASH_BITS) bits are not enough to
    /// separate the key from a full bucket's worth of entries.
    pub(crate) fn depth_needed(&self, hash: u64) -> Option<u32> {
        let mut depth = self.local_depth;
        loop {
            let mask = low_bits(depth);
            let colliding = self
                .entries
                .iter()
                .filter(|e| e.hash & mask == hash & mask)
                .count();
            if colliding < self.capacity {
                return Some(depth);
            }
            if depth >= u64::BITS {
                return None;
            }
            depth += 1;
        }
    }

    /// Split on the next hash bit.
    ///
    /// Bumps the local depth and moves every entry whose newly significant
    /// bit (`local_depth - 1` after the bump) is set into the returned
    /// sibling, which gets the same new depth.
    pub(crate) fn split(&mut self) -> Bucket<K, V> {
        let high_bit = 1u64 << self.local_depth;
        self.local_depth += 1;

        let (moved, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.hash & high_bit != 0);
        self.entries = kept;
        self.entries.reserve(self.capacity.saturating_sub(self.entries.len()));

        let mut sibling = Bucket::new(self.local_depth, self.capacity);
        sibling.entries.extend(moved);
        sibling
    }
}
