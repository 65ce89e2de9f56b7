//! Extendible hashing.
//!
//! # Components
//! - [`HashFunction`] - Key to 64-bit hash ([`Xxh3Hash`], [`IdentityHash`])
//! - [`ExtendibleHashTable`] - The table: directory + buckets + locking
//! - [`HashTable`] - The find/insert/remove interface callers program against
//! - [`DirectorySnapshot`] - Consistent view of the layout for diagnostics
//! - [`HashTableStats`] - Operation counters

mod bucket;
mod directory;
mod extendible_hash_table;
mod hash_function;
mod snapshot;
mod stats;

pub use extendible_hash_table::ExtendibleHashTable;
pub use hash_function::{HashFunction, IdentityHash, Xxh3Hash};
pub use snapshot::DirectorySnapshot;
pub use stats::{HashTableStats, StatsSnapshot};

use crate::common::Result;

/// A concurrent key/value index.
///
/// Absence is reported through the return value, never as an error.
/// Implementations are shared by reference across threads, so every method
/// takes `&self`.
pub trait HashTable<K, V> {
    /// Value stored for `key`, if any.
    fn find(&self, key: &K) -> Option<V>;

    /// Insert or overwrite `key`.
    fn insert(&self, key: K, value: V) -> Result<()>;

    /// Remove `key`, returning whether it was present.
    fn remove(&self, key: &K) -> bool;
}
