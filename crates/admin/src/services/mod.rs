//! Services shared by admin route handlers.
//!
//! - `regions` - Cached province and city lists
//! - `storage` - Product image files on local disk

pub mod regions;
pub mod storage;

pub use regions::RegionCache;
pub use storage::{ImageStore, StorageError, Upload};
