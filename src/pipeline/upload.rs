// src/pipeline/upload.rs

//! Object upload stage.

use std::path::Path;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::UploadJob;
use crate::storage::ObjectStore;

/// Push one local file to the store under its mapped key.
pub async fn upload_one(store: &dyn ObjectStore, root: &Path, job: &UploadJob) -> Result<()> {
    let path = root.join(&job.relative_path);
    let body = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::io(&path, e))?;

    log::info!("copy: {}", job.key);
    store.put_object(&job.key, body, &job.content_type).await
}

/// Upload every job with at most `concurrency` requests in flight.
///
/// Returns the number of objects written. The first failure stops the stage:
/// uploads still in flight are dropped and no further ones are started.
pub async fn upload_all(
    store: &dyn ObjectStore,
    root: &Path,
    jobs: &[UploadJob],
    concurrency: usize,
) -> Result<usize> {
    let mut uploads = stream::iter(jobs)
        .map(|job| async move { upload_one(store, root, job).await })
        .buffer_unordered(concurrency.max(1));

    let mut uploaded = 0;
    while let Some(result) = uploads.next().await {
        result?;
        uploaded += 1;
    }

    Ok(uploaded)
}
