//! CDN cache invalidation.

#[cfg(feature = "aws")]
pub mod cloudfront;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "aws")]
pub use cloudfront::CloudFrontInvalidator;
#[cfg(test)]
pub use memory::MemoryCdn;

/// Path pattern covering every object behind the distribution.
pub const WILDCARD: &str = "/*";

/// Trait for CDNs that can drop cached copies of paths.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Identifier of the distribution being invalidated.
    fn distribution_id(&self) -> &str;

    /// Request invalidation of `paths`.
    ///
    /// `caller_reference` must be unique per request. Returns the id the
    /// CDN assigned to the invalidation. Fails with `AppError::Invalidation`.
    async fn create_invalidation(&self, paths: &[&str], caller_reference: &str) -> Result<String>;
}
