//! Object store abstraction.
//!
//! The deployer only needs three operations from the store: replace an
//! object, list one page of keys under a prefix, and delete an object.
//! Pagination is surfaced to callers so the pruner can assemble the full
//! listing itself.

#[cfg(test)]
pub mod memory;
#[cfg(feature = "aws")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub use memory::MemoryStore;
#[cfg(feature = "aws")]
pub use s3::S3Store;

/// One page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub keys: Vec<String>,
    /// Token for the next page, `None` on the last page
    pub next: Option<String>,
}

/// Trait for deploy targets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable location, e.g. `s3://bucket`.
    fn location(&self) -> String;

    /// Write `body` under `key`, replacing any existing object.
    ///
    /// Fails with `AppError::Upload`.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Fetch one page of keys under `prefix`.
    ///
    /// Fails with `AppError::List`.
    async fn list_page(&self, prefix: &str, continuation: Option<String>) -> Result<ObjectPage>;

    /// Remove the object at `key`.
    ///
    /// Fails with `AppError::Delete`.
    async fn delete_object(&self, key: &str) -> Result<()>;
}
