//! Error types for the hash table.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the hash table can report.
///
/// A missing key is *not* an error: `find` returns `Option` and `remove`
/// returns `bool`. Only misuse and pathological hash distributions end up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A directory slot index outside `0..len` was requested.
    #[error("directory index {index} out of range (directory has {len} slots)")]
    InvalidIndex { index: usize, len: usize },

    /// Inserting the key would need a split deeper than the table allows.
    ///
    /// Raised before anything is modified, so the table is left exactly
    /// as it was before the call.
    #[error("insert requires splitting beyond maximum depth {max_depth}")]
    DepthExceeded { max_depth: u32 },

    /// The table was constructed with unusable parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
