//! Frame identifier, the value type of the page table.

use std::fmt;

/// Position of a frame in the buffer pool's frame array.
///
/// The page table maps a [`PageId`](crate::PageId) to the `FrameId` holding
/// it. A `usize` so the buffer pool can index `frames[frame_id.0]` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

impl FrameId {
    /// Create a new FrameId.
    #[inline]
    pub fn new(id: usize) -> Self {
        FrameId(id)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}
