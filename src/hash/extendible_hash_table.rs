//! Extendible hash table - the page table behind the buffer pool.
//!
//! The [`ExtendibleHashTable`] provides:
//! - Amortized O(1) find / insert / remove
//! - Incremental growth: a full bucket splits in two, and the directory
//!   doubles only when the splitting bucket is as deep as the directory
//! - Concurrent access from any number of threads

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::common::{Result, TableConfig};
use crate::hash::directory::Directory;
use crate::hash::{DirectorySnapshot, HashFunction, HashTable, HashTableStats, Xxh3Hash};

/// A dynamic hash index that grows by splitting buckets.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │                    ExtendibleHashTable                       │
/// │  hash(key) ──▶ low global_depth bits ──▶ directory slot      │
/// │                                                              │
/// │  directory (global_depth = 2)      buckets (arena)           │
/// │  ┌────┐                            ┌───────────────────┐     │
/// │  │ 00 │──────────────┐             │ #0  depth 1  [..] │     │
/// │  │ 01 │──────────┐   └────────────▶│                   │     │
/// │  │ 10 │──────────┼───────────────▶ └───────────────────┘     │
/// │  │ 11 │───┐      └───────────────▶ #1  depth 2  [..]         │
/// │  └────┘   └──────────────────────▶ #2  depth 2  [..]         │
/// └──────────────────────────────────────────────────────────────┘
/// ```
/// A bucket at local depth `d` is shared by `2^(global_depth - d)` slots.
///
/// # Thread Safety
/// - `directory`: `RwLock` - shared for lookups, exclusive while the
///   directory changes shape (split, doubling, slot rewiring)
/// - each bucket: `RwLock` - taken while holding the directory read lock
/// - `len`, `stats`: atomics, no lock
///
/// Find, remove, and inserts that fit into their bucket only hold the
/// directory lock shared, so they proceed in parallel on different buckets.
/// An insert into a full bucket retries under the exclusive lock; readers
/// see either the directory before the split or after it, never partway.
///
/// # Growth only
/// Buckets never merge and the directory never shrinks. Removing keys frees
/// room in their bucket but leaves the structure as it was.
///
/// # Example
/// ```
/// use extendible_hash::ExtendibleHashTable;
///
/// let table = ExtendibleHashTable::new(2);
/// table.insert(1u64, "a").unwrap();
/// table.insert(2u64, "b").unwrap();
/// table.insert(3u64, "c").unwrap();
///
/// assert_eq!(table.find(&2), Some("b"));
/// assert!(table.remove(&2));
/// assert_eq!(table.find(&2), None);
/// assert!(table.num_buckets() >= 2);
/// ```
pub struct ExtendibleHashTable<K, V, H = Xxh3Hash> {
    directory: RwLock<Directory<K, V>>,

    hasher: H,

    config: TableConfig,

    /// Number of stored keys.
    len: AtomicUsize,

    stats: HashTableStats,
}

impl<K: Hash + Eq, V> ExtendibleHashTable<K, V, Xxh3Hash> {
    /// Create a table whose buckets hold `bucket_capacity` entries.
    ///
    /// # Panics
    /// Panics if `bucket_capacity` is 0.
    pub fn new(bucket_capacity: usize) -> Self {
        Self::with_hasher(bucket_capacity, Xxh3Hash)
    }

    /// Create a table from a validated config.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the config is rejected by
    ///   [`TableConfig::validate`]
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, Xxh3Hash)
    }
}

impl<K: Hash + Eq, V> Default for ExtendibleHashTable<K, V, Xxh3Hash> {
    fn default() -> Self {
        Self::build(TableConfig::default(), Xxh3Hash)
    }
}

impl<K: Eq, V, H: HashFunction<K>> ExtendibleHashTable<K, V, H> {
    /// Create a table with a custom hash function.
    ///
    /// # Panics
    /// Panics if `bucket_capacity` is 0.
    pub fn with_hasher(bucket_capacity: usize, hasher: H) -> Self {
        assert!(bucket_capacity > 0, "bucket_capacity must be > 0");
        Self::build(TableConfig::new(bucket_capacity), hasher)
    }

    /// Create a table from a config and a custom hash function.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the config is rejected by
    ///   [`TableConfig::validate`]
    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hasher))
    }

    fn build(config: TableConfig, hasher: H) -> Self {
        log::debug!(
            "creating extendible hash table (bucket capacity {}, max depth {})",
            config.bucket_capacity,
            config.max_depth
        );
        Self {
            directory: RwLock::new(Directory::new(config.bucket_capacity)),
            hasher,
            config,
            len: AtomicUsize::new(0),
            stats: HashTableStats::new(),
        }
    }

    // ========================================================================
    // Public API: Lookup and modification
    // ========================================================================

    /// Look up the value stored for `key`.
    ///
    /// Returns `None` if the key is absent.
    pub fn find(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let hash = self.hasher.hash_key(key);
        let found = {
            let directory = self.directory.read();
            let bucket = directory.bucket_for(hash).read();
            bucket.get(key, hash).cloned()
        };

        HashTableStats::bump(&self.stats.lookups, 1);
        if found.is_some() {
            HashTableStats::bump(&self.stats.hits, 1);
        }
        found
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.hasher.hash_key(key);
        let directory = self.directory.read();
        let bucket = directory.bucket_for(hash).read();
        bucket.get(key, hash).is_some()
    }

    /// Insert `key`, overwriting the value if it is already present.
    ///
    /// Overwriting never changes the table's structure. Inserting a new key
    /// into a full bucket splits it (repeatedly, if the entries keep landing
    /// on the key's side) and may double the directory.
    ///
    /// # Errors
    /// - `Error::DepthExceeded` if separating the key from the bucket's
    ///   entries needs more hash bits than the configured maximum depth.
    ///   The table is unchanged in that case.
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        let hash = self.hasher.hash_key(&key);

        // Fast path: the bucket has room or already holds the key
        let (key, value) = {
            let directory = self.directory.read();
            let mut bucket = directory.bucket_for(hash).write();
            match bucket.insert(key, value, hash) {
                Ok(added) => {
                    self.record_insert(added);
                    return Ok(());
                }
                Err(pair) => pair,
            }
        };

        // Slow path: the directory may change shape. Another writer may have
        // split the bucket between the two locks; the directory re-checks.
        let mut directory = self.directory.write();
        match directory.insert(key, value, hash, self.config.max_depth) {
            Ok(report) => {
                HashTableStats::bump(&self.stats.splits, u64::from(report.splits));
                HashTableStats::bump(&self.stats.doublings, u64::from(report.doublings));
                self.record_insert(report.added);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "rejected insert of hash {hash:#018x} at global depth {}: {err}",
                    directory.global_depth()
                );
                HashTableStats::bump(&self.stats.rejected_inserts, 1);
                Err(err)
            }
        }
    }

    /// Remove `key`. Returns whether it was present.
    ///
    /// Never merges buckets or shrinks the directory.
    pub fn remove(&self, key: &K) -> bool {
        let hash = self.hasher.hash_key(key);
        let removed = {
            let directory = self.directory.read();
            let mut bucket = directory.bucket_for(hash).write();
            bucket.remove(key, hash).is_some()
        };

        if removed {
            self.len.fetch_sub(1, Ordering::Relaxed);
            HashTableStats::bump(&self.stats.removals, 1);
        }
        removed
    }

    fn record_insert(&self, added: bool) {
        if added {
            self.len.fetch_add(1, Ordering::Relaxed);
            HashTableStats::bump(&self.stats.inserts, 1);
        }
    }

    // ========================================================================
    // Public API: Introspection
    // ========================================================================

    /// Number of low-order hash bits used to index the directory.
    pub fn global_depth(&self) -> u32 {
        self.directory.read().global_depth()
    }

    /// Local depth of the bucket referenced by directory slot `index`.
    ///
    /// # Errors
    /// - `Error::InvalidIndex` if `index >= 2^global_depth`
    pub fn local_depth(&self, index: usize) -> Result<u32> {
        self.directory.read().local_depth(index)
    }

    /// Number of distinct buckets.
    pub fn num_buckets(&self) -> usize {
        self.directory.read().num_buckets()
    }

    /// Number of directory slots (always `2^global_depth`).
    pub fn directory_len(&self) -> usize {
        self.directory.read().len()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Whether the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Construction parameters.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Operation counters.
    pub fn stats(&self) -> &HashTableStats {
        &self.stats
    }

    /// Consistent copy of the directory layout.
    pub fn snapshot(&self) -> DirectorySnapshot {
        self.directory.read().snapshot()
    }
}

impl<K, V, H> HashTable<K, V> for ExtendibleHashTable<K, V, H>
where
    K: Eq,
    V: Clone,
    H: HashFunction<K>,
{
    fn find(&self, key: &K) -> Option<V> {
        ExtendibleHashTable::find(self, key)
    }

    fn insert(&self, key: K, value: V) -> Result<()> {
        ExtendibleHashTable::insert(self, key, value)
    }

    fn remove(&self, key: &K) -> bool {
        ExtendibleHashTable::remove(self, key)
    }
}

impl<K: Eq, V, H: HashFunction<K>> fmt::Debug for ExtendibleHashTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directory = self.directory.read();
        f.debug_struct("ExtendibleHashTable")
            .field("global_depth", &directory.global_depth())
            .field("num_buckets", &directory.num_buckets())
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
