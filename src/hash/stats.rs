//! Hash table statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for a hash table.
///
/// All fields are atomic so readers holding only a bucket lock can bump
/// them. `Ordering::Relaxed` throughout: counters are independent and only
/// need to be eventually consistent.
///
/// # Example
/// ```
/// use extendible_hash::ExtendibleHashTable;
///
/// let table: ExtendibleHashTable<u64, &str> = ExtendibleHashTable::new(4);
/// table.insert(1, "a").unwrap();
/// assert_eq!(table.find(&1), Some("a"));
/// assert_eq!(table.find(&2), None);
///
/// let snapshot = table.stats().snapshot();
/// assert_eq!(snapshot.lookups, 2);
/// assert_eq!(snapshot.hits, 1);
/// ```
#[derive(Debug, Default)]
pub struct HashTableStats {
    /// Calls to `find`.
    pub lookups: AtomicU64,

    /// Calls to `find` that located the key.
    pub hits: AtomicU64,

    /// Inserts that added a new key (overwrites are not counted).
    pub inserts: AtomicU64,

    /// Calls to `remove` that deleted a key.
    pub removals: AtomicU64,

    /// Bucket splits.
    pub splits: AtomicU64,

    /// Times the directory doubled.
    pub doublings: AtomicU64,

    /// Inserts rejected with `DepthExceeded`.
    pub rejected_inserts: AtomicU64,
}

impl HashTableStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    /// Fraction of lookups that hit (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            doublings: self.doublings.load(Ordering::Relaxed),
            rejected_inserts: self.rejected_inserts.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.lookups,
            &self.hits,
            &self.inserts,
            &self.removals,
            &self.splits,
            &self.doublings,
            &self.rejected_inserts,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// A point-in-time copy of [`HashTableStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub inserts: u64,
    pub removals: u64,
    pub splits: u64,
    pub doublings: u64,
    pub rejected_inserts: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that hit (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ lookups: {}, hit_rate: {:.2}%, inserts: {}, removals: {}, splits: {}, doublings: {} }}",
            self.lookups,
            self.hit_rate() * 100.0,
            self.inserts,
            self.removals,
            self.splits,
            self.doublings
        )
    }
}
