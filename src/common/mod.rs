//! Shared primitives: configuration, errors, and the page table's
//! key/value types.

pub mod config;
pub mod error;
mod frame_id;
mod page_id;

pub use config::TableConfig;
pub use error::{Error, Result};
pub use frame_id::FrameId;
pub use page_id::PageId;
