//! AWS S3 object store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::storage::{ObjectPage, ObjectStore};

/// S3 bucket used as the deploy target.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    page_size: i32,
}

impl S3Store {
    /// Create a new store over an already configured client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size: 1000,
        }
    }

    /// Limit the number of keys requested per listing page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = i32::try_from(page_size).unwrap_or(i32::MAX).max(1);
        self
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::upload(key, DisplayErrorContext(&e)))?;

        Ok(())
    }

    async fn list_page(&self, prefix: &str, continuation: Option<String>) -> Result<ObjectPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(self.page_size)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| AppError::list(prefix, DisplayErrorContext(&e)))?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(str::to_string)
            .collect();

        let next = if output.is_truncated().unwrap_or(false) {
            let token = output.next_continuation_token().ok_or_else(|| {
                AppError::list(prefix, "truncated listing without a continuation token")
            })?;
            Some(token.to_string())
        } else {
            None
        };

        log::debug!(
            "Listed page under s3://{}/{} (more: {})",
            self.bucket,
            prefix,
            next.is_some()
        );

        Ok(ObjectPage { keys, next })
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::delete(key, DisplayErrorContext(&e)))?;

        Ok(())
    }
}
