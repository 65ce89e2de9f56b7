//! Page identifier, the key type of the page table.

use std::fmt;

/// Identifies a page on disk.
///
/// The buffer pool manager looks pages up by `PageId` before every access,
/// so this is the key type of [`PageTable`](crate::PageTable). Page ids are
/// handed out sequentially, which makes their low bits already well spread
/// and lets the page table index the directory with the id itself
/// (see [`IdentityHash`](crate::hash::IdentityHash)).
///
/// # Example
/// ```
/// use extendible_hash::PageId;
///
/// let page_id = PageId::new(42);
/// assert!(page_id.is_valid());
/// assert_eq!(page_id.as_u32(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Sentinel for "no page".
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Raw id value.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this page ID is valid (not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        PageId(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Page({})", self.0)
        } else {
            write!(f, "Page(INVALID)")
        }
    }
}
