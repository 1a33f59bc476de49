mod domain;
mod resolver;
pub mod storage;

pub use domain::{ListingMedia, StoredCopy};
pub use resolver::{MediaUrlError, MediaUrlResolver};
pub use storage::{DiskUrlMap, StorageUrlResolver};
