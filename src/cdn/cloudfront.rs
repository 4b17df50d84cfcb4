//! AWS CloudFront invalidation client.

use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::error::DisplayErrorContext;
use aws_sdk_cloudfront::operation::create_invalidation::CreateInvalidationOutput;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};

use crate::cdn::CacheInvalidator;
use crate::error::{AppError, Result};

/// Invalidates cached objects of one CloudFront distribution.
#[derive(Clone)]
pub struct CloudFrontInvalidator {
    client: Client,
    distribution_id: String,
}

impl CloudFrontInvalidator {
    pub fn new(client: Client, distribution_id: impl Into<String>) -> Self {
        Self {
            client,
            distribution_id: distribution_id.into(),
        }
    }
}

#[async_trait]
impl CacheInvalidator for CloudFrontInvalidator {
    fn distribution_id(&self) -> &str {
        &self.distribution_id
    }

    async fn create_invalidation(&self, paths: &[&str], caller_reference: &str) -> Result<String> {
        let items: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        let quantity = i32::try_from(items.len())
            .map_err(|_| AppError::invalidation(&self.distribution_id, "too many paths"))?;

        let paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(items))
            .build()
            .map_err(|e| AppError::invalidation(&self.distribution_id, e))?;

        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(|e| AppError::invalidation(&self.distribution_id, e))?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| AppError::invalidation(&self.distribution_id, DisplayErrorContext(&e)))?;

        invalidation_id(&output, &self.distribution_id)
    }
}

/// The id CloudFront assigned to an accepted invalidation.
fn invalidation_id(output: &CreateInvalidationOutput, distribution_id: &str) -> Result<String> {
    output
        .invalidation()
        .map(|invalidation| invalidation.id().to_string())
        .ok_or_else(|| AppError::invalidation(distribution_id, "response carried no invalidation id"))
}
