//! A concurrent extendible hash table, built as the page table of a
//! database buffer pool.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Buffer Pool Manager                         │
//! │     (caller: eviction, pinning, disk I/O live out there)        │
//! └─────────────────────────────────────────────────────────────────┘
//!        find(PageId)     insert(PageId, FrameId)     remove(PageId)
//!                              ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  ExtendibleHashTable (hash/)                    │
//! │  ┌──────────────┐  ┌─────────────────────┐  ┌───────────────┐  │
//! │  │ HashFunction │→ │ Directory           │→ │ Buckets       │  │
//! │  │ key → u64    │  │ 2^global_depth slots│  │ ≤ capacity    │  │
//! │  └──────────────┘  └─────────────────────┘  └───────────────┘  │
//! │      RwLock<Directory>  +  RwLock per bucket  +  atomic stats   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`hash`] - Hash functions, the table, statistics
//!
//! # Quick Start
//! ```
//! use extendible_hash::{FrameId, IdentityHash, PageId, PageTable};
//!
//! let page_table = PageTable::with_hasher(4, IdentityHash);
//!
//! // Page 7 was loaded into frame 2
//! page_table.insert(PageId::new(7), FrameId::new(2)).unwrap();
//! assert_eq!(page_table.find(&PageId::new(7)), Some(FrameId::new(2)));
//!
//! // Page 7 was evicted
//! assert!(page_table.remove(&PageId::new(7)));
//! ```

pub mod common;
pub mod hash;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_BUCKET_CAPACITY, DEFAULT_MAX_DEPTH, HASH_BITS};
pub use common::{Error, FrameId, PageId, Result, TableConfig};

pub use hash::{
    DirectorySnapshot, ExtendibleHashTable, HashFunction, HashTable, HashTableStats,
    IdentityHash, StatsSnapshot, Xxh3Hash,
};

/// Maps resident pages to the frames holding them.
pub type PageTable = ExtendibleHashTable<PageId, FrameId, IdentityHash>;
