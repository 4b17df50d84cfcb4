//! Recording CDN used to observe invalidation requests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::cdn::CacheInvalidator;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub paths: Vec<String>,
    pub caller_reference: String,
}

#[derive(Default)]
pub struct MemoryCdn {
    requests: Mutex<Vec<InvalidationRequest>>,
    fail: bool,
}

impl MemoryCdn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<InvalidationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for MemoryCdn {
    fn distribution_id(&self) -> &str {
        "EMEMORY"
    }

    async fn create_invalidation(&self, paths: &[&str], caller_reference: &str) -> Result<String> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(InvalidationRequest {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            caller_reference: caller_reference.to_string(),
        });

        if self.fail {
            return Err(AppError::invalidation("EMEMORY", "injected failure"));
        }
        Ok(format!("I{}", requests.len()))
    }
}
