//! Key hashing.
//!
//! The directory is indexed by the low `global_depth` bits of a key's hash,
//! and a split partitions a bucket by the next bit up. Whatever produces the
//! hash therefore has to be deterministic for the lifetime of the table and
//! should spread keys across the low bits.

use std::hash::{Hash, Hasher};

use xxhash_rust::xxh3::Xxh3Default;

use crate::common::PageId;

/// Deterministic mapping from a key to a 64-bit hash.
///
/// Not required to be cryptographically strong.
pub trait HashFunction<K: ?Sized> {
    /// Hash `key`. Equal keys must produce equal hashes.
    fn hash_key(&self, key: &K) -> u64;
}

/// Default hash function: runs the key's [`Hash`] impl through XXH3.
///
/// Seedless, so every table (and every process) hashes a key the same way.
/// Two tables fed the same keys end up with the same shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Hash;

/// Adapts the streaming XXH3 state to [`Hasher`].
struct Xxh3Writer(Xxh3Default);

impl Hasher for Xxh3Writer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0.digest()
    }
}

impl<K: Hash + ?Sized> HashFunction<K> for Xxh3Hash {
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = Xxh3Writer(Xxh3Default::new());
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// Integer keys hash to themselves.
///
/// Useful when keys are already uniformly spread in their low bits, such as
/// sequentially allocated page ids. Also makes the directory layout easy to
/// predict: key `k` lives in slot `k & (2^global_depth - 1)`.
///
/// Signed integers are sign-extended to 64 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHash;

macro_rules! identity_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HashFunction<$ty> for IdentityHash {
                #[inline]
                fn hash_key(&self, key: &$ty) -> u64 {
                    *key as u64
                }
            }
        )*
    };
}

identity_hash!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl HashFunction<PageId> for IdentityHash {
    #[inline]
    fn hash_key(&self, key: &PageId) -> u64 {
        u64::from(key.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh3_is_deterministic() {
        let a = Xxh3Hash;
        let b = Xxh3Hash;
        assert_eq!(a.hash_key(&42u64), b.hash_key(&42u64));
        assert_eq!(a.hash_key("page"), b.hash_key("page"));
        assert_eq!(a.hash_key(&PageId::new(9)), a.hash_key(&PageId::new(9)));
    }

    #[test]
    fn test_xxh3_spreads_low_bits() {
        // Sequential keys should land in all 16 low-bit classes.
        let mut seen = [false; 16];
        for key in 0u64..256 {
            seen[(Xxh3Hash.hash_key(&key) & 0xF) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_identity_hash() {
        assert_eq!(IdentityHash.hash_key(&7u32), 7);
        assert_eq!(IdentityHash.hash_key(&7usize), 7);
        assert_eq!(IdentityHash.hash_key(&-1i32), u64::MAX);
        assert_eq!(IdentityHash.hash_key(&PageId::new(12)), 12);
    }
}
