//! Configuration for the extendible hash table.

use crate::common::{Error, Result};

/// Width of every hash value, in bits.
///
/// A key's hash can distinguish it from another key by at most this many
/// bits, so no bucket can ever need a local depth above `HASH_BITS`.
pub const HASH_BITS: u32 = u64::BITS;

/// Deepest directory that can be addressed in memory.
///
/// The directory holds `2^global_depth` slots, so the depth must leave the
/// slot count representable as a `usize`.
pub const MAX_DIRECTORY_DEPTH: u32 = if usize::BITS - 1 < HASH_BITS {
    usize::BITS - 1
} else {
    HASH_BITS
};

/// Depth cap used when none is configured.
///
/// # Memory
/// A directory at depth 32 already has 4,294,967,296 slots (32GB of bucket
/// ids on 64-bit targets). Key sets that need more than this are almost
/// certainly degenerate, and failing the insert is better than exhausting
/// memory.
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Bucket capacity used by [`TableConfig::default`].
pub const DEFAULT_BUCKET_CAPACITY: usize = 16;

/// Construction parameters for an
/// [`ExtendibleHashTable`](crate::hash::ExtendibleHashTable).
///
/// # Example
/// ```
/// use extendible_hash::TableConfig;
///
/// let config = TableConfig::new(4).with_max_depth(10);
/// assert!(config.validate().is_ok());
///
/// assert!(TableConfig::new(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Maximum number of entries a bucket holds before it must split.
    pub bucket_capacity: usize,

    /// Deepest the directory (and so any bucket) may grow.
    pub max_depth: u32,
}

impl TableConfig {
    /// Config with the given bucket capacity and the default depth cap.
    pub fn new(bucket_capacity: usize) -> Self {
        Self {
            bucket_capacity,
            max_depth: DEFAULT_MAX_DEPTH.min(MAX_DIRECTORY_DEPTH),
        }
    }

    /// Override the depth cap.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Check that the parameters describe a table that can be built.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the bucket capacity is zero
    /// - `Error::InvalidConfig` if `max_depth` exceeds [`MAX_DIRECTORY_DEPTH`]
    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(Error::InvalidConfig("bucket capacity must be > 0"));
        }
        if self.max_depth > MAX_DIRECTORY_DEPTH {
            return Err(Error::InvalidConfig(
                "max depth exceeds the addressable directory size",
            ));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_directory_depth_fits_usize() {
        assert!(MAX_DIRECTORY_DEPTH <= HASH_BITS);
        assert!(MAX_DIRECTORY_DEPTH < usize::BITS);
        // The largest directory length must not overflow the shift.
        let _ = 1usize << MAX_DIRECTORY_DEPTH;
    }

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.bucket_capacity, DEFAULT_BUCKET_CAPACITY);
        assert!(config.max_depth <= DEFAULT_MAX_DEPTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = TableConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_max_depth_bounds() {
        assert!(TableConfig::new(1).with_max_depth(0).validate().is_ok());
        assert!(TableConfig::new(1)
            .with_max_depth(MAX_DIRECTORY_DEPTH)
            .validate()
            .is_ok());
        assert!(TableConfig::new(1)
            .with_max_depth(MAX_DIRECTORY_DEPTH + 1)
            .validate()
            .is_err());
    }
}
