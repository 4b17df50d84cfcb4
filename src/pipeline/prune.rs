// src/pipeline/prune.rs

//! Removal of stale objects under the managed prefix.
//!
//! The remote listing is always assembled in full before it is compared
//! with the local key set; deciding on a partial listing would delete
//! objects the new build still references.

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::ManagedKeySet;
use crate::storage::ObjectStore;

/// Result of a prune pass.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    /// Keys that were removed
    pub deleted: Vec<String>,
    /// Deletes that failed; the objects are left in place
    pub failures: Vec<AppError>,
}

/// Fetch every key under `prefix`, following continuation tokens.
pub async fn list_all_keys(store: &dyn ObjectStore, prefix: &str) -> Result<BTreeSet<String>> {
    let mut keys = BTreeSet::new();
    let mut continuation: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.list_page(prefix, continuation.clone()).await?;
        pages += 1;
        keys.extend(page.keys);

        match page.next {
            Some(next) if continuation.as_deref() == Some(next.as_str()) => {
                return Err(AppError::list(
                    prefix,
                    format!("continuation token {next:?} repeated"),
                ));
            }
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    log::debug!(
        "Listed {} keys under {}/{} in {} page(s)",
        keys.len(),
        store.location(),
        prefix,
        pages
    );
    Ok(keys)
}

/// Keys present remotely under `prefix` but absent from the current build.
pub fn stale_keys(remote: &BTreeSet<String>, managed: &ManagedKeySet, prefix: &str) -> Vec<String> {
    remote
        .iter()
        .filter(|key| key.starts_with(prefix))
        .filter(|key| !managed.contains(key))
        .cloned()
        .collect()
}

/// Delete `keys` with at most `concurrency` requests in flight.
///
/// Individual failures are collected rather than returned.
pub async fn delete_keys(
    store: &dyn ObjectStore,
    keys: Vec<String>,
    concurrency: usize,
) -> PruneOutcome {
    let mut deletes = stream::iter(keys)
        .map(|key| async move {
            log::info!("delete: {}", key);
            let result = store.delete_object(&key).await;
            (key, result)
        })
        .buffer_unordered(concurrency.max(1));

    let mut outcome = PruneOutcome::default();
    while let Some((key, result)) = deletes.next().await {
        match result {
            Ok(()) => outcome.deleted.push(key),
            Err(error) => {
                log::warn!("Failed to delete {}: {}", key, error);
                outcome.failures.push(error);
            }
        }
    }

    outcome.deleted.sort();
    outcome
}

/// List the managed prefix and delete everything the build no longer has.
///
/// Fails only if the listing fails.
pub async fn prune(
    store: &dyn ObjectStore,
    managed: &ManagedKeySet,
    prefix: &str,
    concurrency: usize,
) -> Result<PruneOutcome> {
    let remote = list_all_keys(store, prefix).await?;
    let stale = stale_keys(&remote, managed, prefix);

    if stale.is_empty() {
        log::info!("Nothing to prune under {}", prefix);
        return Ok(PruneOutcome::default());
    }

    Ok(delete_keys(store, stale, concurrency).await)
}
