//! In-memory object store for exercising the pipeline.
//!
//! Listings are paginated and failures can be injected per key, so the
//! upload, prune and orchestration logic can be driven without a bucket.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{ObjectPage, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Store operations in the order they were issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put(String),
    List(String),
    Delete(String),
}

pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    calls: Mutex<Vec<StoreCall>>,
    page_size: usize,
    /// Latency of each put and delete
    latency: Duration,
    fail_puts: HashSet<String>,
    fail_deletes: HashSet<String>,
    fail_list: bool,
    extra_listed: Vec<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    deletes_in_flight: AtomicUsize,
    max_deletes_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            page_size: 1000,
            latency: Duration::from_millis(1),
            fail_puts: HashSet::new(),
            fail_deletes: HashSet::new(),
            fail_list: false,
            extra_listed: Vec::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            deletes_in_flight: AtomicUsize::new(0),
            max_deletes_in_flight: AtomicUsize::new(0),
        }
    }

    /// Pre-populate objects with empty bodies.
    pub fn with_keys<'a>(self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        {
            let mut objects = self.objects.lock().unwrap();
            for key in keys {
                objects.insert(
                    key.to_string(),
                    StoredObject {
                        body: Vec::new(),
                        content_type: "text/plain".into(),
                    },
                );
            }
        }
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_latency(mut self, delay: Duration) -> Self {
        self.latency = delay;
        self
    }

    pub fn failing_put(mut self, key: &str) -> Self {
        self.fail_puts.insert(key.to_string());
        self
    }

    pub fn failing_delete(mut self, key: &str) -> Self {
        self.fail_deletes.insert(key.to_string());
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Keys returned by every listing regardless of the requested prefix.
    pub fn listing_extra(mut self, key: &str) -> Self {
        self.extra_listed.push(key.to_string());
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, matches: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    /// Highest number of uploads observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of deletes observed in flight at once.
    pub fn max_deletes_in_flight(&self) -> usize {
        self.max_deletes_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn location(&self) -> String {
        "memory://".to_string()
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.record(StoreCall::Put(key.to_string()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_puts.contains(key) {
            return Err(AppError::upload(key, "injected failure"));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list_page(&self, prefix: &str, continuation: Option<String>) -> Result<ObjectPage> {
        self.record(StoreCall::List(prefix.to_string()));

        if self.fail_list {
            return Err(AppError::list(prefix, "injected failure"));
        }

        let mut all: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        all.extend(self.extra_listed.iter().cloned());

        let start = match continuation {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AppError::list(prefix, "bad continuation token"))?,
            None => 0,
        };
        let end = (start + self.page_size).min(all.len());
        let next = (end < all.len()).then(|| end.to_string());

        Ok(ObjectPage {
            keys: all[start.min(end)..end].to_vec(),
            next,
        })
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.record(StoreCall::Delete(key.to_string()));

        let current = self.deletes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_deletes_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.deletes_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_deletes.contains(key) {
            return Err(AppError::delete(key, "injected failure"));
        }

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
