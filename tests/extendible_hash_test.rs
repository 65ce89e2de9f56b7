//! Extendible Hash Table Tests
//!
//! Scenario tests against the public API. Integer keys use `IdentityHash`
//! so the directory layout after each insert can be worked out by hand.

use extendible_hash::{
    Error, ExtendibleHashTable, HashFunction, IdentityHash, TableConfig,
};

type Table = ExtendibleHashTable<i32, String, IdentityHash>;

fn create_table(capacity: usize) -> Table {
    ExtendibleHashTable::with_hasher(capacity, IdentityHash)
}

fn find(table: &Table, key: i32) -> Option<String> {
    table.find(&key)
}

// ============================================================================
// SampleTest
// ============================================================================

/// Nine keys into buckets of two.
#[test]
fn test_sample() {
    let table = create_table(2);
    for (key, value) in (1..=9).zip(["a", "b", "c", "d", "e", "f", "g", "h", "i"]) {
        table.insert(key, value.to_string()).unwrap();
    }

    assert_eq!(table.global_depth(), 3);
    assert_eq!(table.num_buckets(), 5);

    assert_eq!(table.local_depth(0), Ok(2));
    assert_eq!(table.local_depth(1), Ok(3));
    assert_eq!(table.local_depth(2), Ok(2));
    assert_eq!(table.local_depth(3), Ok(2));

    assert_eq!(find(&table, 9).as_deref(), Some("i"));
    assert_eq!(find(&table, 8).as_deref(), Some("h"));
    assert_eq!(find(&table, 2).as_deref(), Some("b"));
    assert_eq!(find(&table, 10), None);

    assert!(table.remove(&8));
    assert!(table.remove(&4));
    assert!(table.remove(&1));
    assert!(!table.remove(&20));

    assert_eq!(table.snapshot().check(), Ok(()));
}

// ============================================================================
// Splits
// ============================================================================

#[test]
fn test_basic_split() {
    let table = create_table(2);
    table.insert(1, "a".into()).unwrap();
    table.insert(2, "b".into()).unwrap();
    assert_eq!(table.global_depth(), 0);
    assert_eq!(table.num_buckets(), 1);

    table.insert(3, "c".into()).unwrap();
    assert_eq!(table.global_depth(), 1);
    assert_eq!(table.num_buckets(), 2);

    assert_eq!(find(&table, 1).as_deref(), Some("a"));
    assert_eq!(find(&table, 2).as_deref(), Some("b"));
    assert_eq!(find(&table, 3).as_deref(), Some("c"));
}

#[test]
fn test_remove_then_find() {
    let table = create_table(2);
    for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
        table.insert(key, value.into()).unwrap();
    }

    assert!(table.remove(&2));
    assert_eq!(find(&table, 2), None);
    assert!(!table.remove(&2));

    // The other keys are untouched
    assert_eq!(find(&table, 1).as_deref(), Some("a"));
    assert_eq!(find(&table, 3).as_deref(), Some("c"));
}

#[test]
fn test_missing_key_on_empty_table() {
    let table = create_table(2);
    assert_eq!(find(&table, 99), None);
    assert!(!table.remove(&99));
    assert_eq!(table.num_buckets(), 1);
    assert_eq!(table.global_depth(), 0);
}

#[test]
fn test_overwrite_is_structural_noop() {
    let table = create_table(2);
    for key in 0..16 {
        table.insert(key, format!("v{key}")).unwrap();
    }
    let depth = table.global_depth();
    let buckets = table.num_buckets();

    for key in 0..16 {
        table.insert(key, format!("w{key}")).unwrap();
    }

    assert_eq!(table.global_depth(), depth);
    assert_eq!(table.num_buckets(), buckets);
    assert_eq!(table.len(), 16);
    for key in 0..16 {
        assert_eq!(find(&table, key), Some(format!("w{key}")));
    }
}

#[test]
fn test_reinsert_after_remove_reuses_space() {
    let table = create_table(2);
    table.insert(1, "a".into()).unwrap();
    table.insert(2, "b".into()).unwrap();
    assert!(table.remove(&1));

    // Room was freed, so no split
    table.insert(5, "e".into()).unwrap();
    assert_eq!(table.num_buckets(), 1);
    assert_eq!(table.global_depth(), 0);
}

#[test]
fn test_negative_keys() {
    let table = create_table(1);
    for key in [-1, -2, -3, 0] {
        table.insert(key, key.to_string()).unwrap();
    }
    for key in [-1, -2, -3, 0] {
        assert_eq!(find(&table, key), Some(key.to_string()));
    }
    assert_eq!(table.snapshot().check(), Ok(()));
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_invariants_hold_while_growing() {
    let table = create_table(3);
    for key in 0..500 {
        table.insert(key * 7, key.to_string()).unwrap();

        let global = table.global_depth();
        assert_eq!(table.directory_len(), 1 << global);
        for slot in 0..table.directory_len() {
            assert!(table.local_depth(slot).unwrap() <= global);
        }
    }

    let snapshot = table.snapshot();
    assert_eq!(snapshot.check(), Ok(()));
    for (bucket_id, &depth) in snapshot.local_depths.iter().enumerate() {
        assert_eq!(
            snapshot.aliases(bucket_id),
            1 << (snapshot.global_depth - depth)
        );
    }
    assert_eq!(snapshot.num_entries(), 500);
}

#[test]
fn test_depths_are_monotonic() {
    let table: ExtendibleHashTable<u64, u64> = ExtendibleHashTable::new(4);
    let mut last_depth = 0;
    let mut last_buckets = 1;

    for key in 0..2000u64 {
        table.insert(key, key).unwrap();
        if key % 3 == 0 {
            table.remove(&(key / 2));
        }
        assert!(table.global_depth() >= last_depth);
        assert!(table.num_buckets() >= last_buckets);
        last_depth = table.global_depth();
        last_buckets = table.num_buckets();
    }
}

#[test]
fn test_local_depth_index_bounds() {
    let table = create_table(2);
    assert_eq!(
        table.local_depth(1),
        Err(Error::InvalidIndex { index: 1, len: 1 })
    );

    for key in 0..10 {
        table.insert(key, String::new()).unwrap();
    }
    let len = table.directory_len();
    assert!(table.local_depth(len - 1).is_ok());
    assert_eq!(
        table.local_depth(len),
        Err(Error::InvalidIndex { index: len, len })
    );
}

// ============================================================================
// DepthExceeded
// ============================================================================

/// Only the lowest byte of the key reaches the hash.
struct LowByteHash;

impl HashFunction<u32> for LowByteHash {
    fn hash_key(&self, key: &u32) -> u64 {
        u64::from(key & 0xFF)
    }
}

#[test]
fn test_colliding_hashes_fail_cleanly() {
    let table: ExtendibleHashTable<u32, i32, LowByteHash> =
        ExtendibleHashTable::with_hasher(2, LowByteHash);
    table.insert(0x100, 1).unwrap();
    table.insert(0x200, 2).unwrap();

    // Same low byte as the resident keys: no number of splits separates them
    let result = table.insert(0x300, 3);
    assert!(matches!(result, Err(Error::DepthExceeded { .. })));

    assert_eq!(table.global_depth(), 0);
    assert_eq!(table.num_buckets(), 1);
    assert_eq!(table.find(&0x100), Some(1));
    assert_eq!(table.find(&0x200), Some(2));
    assert_eq!(table.find(&0x300), None);

    // A key with a different hash still splits in
    table.insert(0x01, 4).unwrap();
    assert_eq!(table.find(&0x01), Some(4));
    assert_eq!(table.snapshot().check(), Ok(()));
}

#[test]
fn test_max_depth_config() {
    let config = TableConfig::new(1).with_max_depth(4);
    let table = ExtendibleHashTable::with_config_and_hasher(config, IdentityHash).unwrap();

    table.insert(0u64, ()).unwrap();
    // Differs from 0 only at bit 4: would need depth 5
    assert_eq!(
        table.insert(16u64, ()),
        Err(Error::DepthExceeded { max_depth: 4 })
    );
    assert_eq!(table.global_depth(), 0);

    // Differs at bit 3: depth 4 is allowed
    table.insert(8u64, ()).unwrap();
    assert_eq!(table.global_depth(), 4);
}
