//! CDN invalidation stage.

use uuid::Uuid;

use crate::cdn::{CacheInvalidator, WILDCARD};
use crate::error::Result;

/// Invalidate every cached path with a single request.
///
/// Each call uses a fresh caller reference so the CDN never treats a new
/// deploy as a retry of an earlier one.
pub async fn invalidate_all(cdn: &dyn CacheInvalidator) -> Result<String> {
    let caller_reference = Uuid::new_v4().to_string();
    log::info!("invalidate: {} {}", cdn.distribution_id(), WILDCARD);

    let id = cdn.create_invalidation(&[WILDCARD], &caller_reference).await?;
    log::debug!("Invalidation {} accepted (ref {})", id, caller_reference);
    Ok(id)
}
