//! Call-recording backend doubles shared by the drover integration tests.

// Not every test binary uses every double.
#![allow(dead_code)]

use async_trait::async_trait;
use basecamp::{
    CallOptions, ClassSchema, Error, MemoryBase, Permissions, Record, RecordQuery, RecordStore,
    Result, SchemaPatch, SchemaSnapshot, SchemaStore,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Wraps any query and records every call made through it.
pub struct RecordingQuery<Q> {
    inner: Q,
    pub count_calls: AtomicU64,
    pub page_calls: Mutex<Vec<(u64, u64)>>,
}

impl<Q> RecordingQuery<Q> {
    pub fn new(inner: Q) -> Self {
        RecordingQuery {
            inner,
            count_calls: AtomicU64::new(0),
            page_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(&self) -> Vec<(u64, u64)> {
        self.page_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<Q: RecordQuery> RecordQuery for RecordingQuery<Q> {
    fn class_name(&self) -> &str {
        self.inner.class_name()
    }

    async fn count(&self, options: &CallOptions) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count(options).await
    }

    async fn find_page(
        &self,
        skip: u64,
        limit: u64,
        options: &CallOptions,
    ) -> Result<Vec<Record>> {
        self.page_calls.lock().unwrap().push((skip, limit));
        self.inner.find_page(skip, limit, options).await
    }
}

/// A query whose page fetch fails at one skip offset.
pub struct FailingPageQuery {
    pub total: u64,
    pub fail_at_skip: u64,
}

#[async_trait]
impl RecordQuery for FailingPageQuery {
    fn class_name(&self) -> &str {
        "Flaky"
    }

    async fn count(&self, _options: &CallOptions) -> Result<u64> {
        Ok(self.total)
    }

    async fn find_page(
        &self,
        skip: u64,
        limit: u64,
        _options: &CallOptions,
    ) -> Result<Vec<Record>> {
        if skip == self.fail_at_skip {
            return Err(Error::Api {
                code: 124,
                message: format!("timeout at skip {skip}"),
            });
        }
        let remaining = self.total.saturating_sub(skip).min(limit);
        Ok((0..remaining).map(|_| Record::new("Flaky")).collect())
    }
}

/// Wraps the in-memory store, recording batch sizes and checking that no
/// two save calls overlap in flight.
pub struct RecordingStore {
    inner: MemoryBase,
    pub save_sizes: Mutex<Vec<usize>>,
    pub delete_sizes: Mutex<Vec<usize>>,
    in_flight: AtomicUsize,
    overlapped: AtomicBool,
    pub fail_save_at: Option<usize>,
}

impl RecordingStore {
    pub fn new(inner: MemoryBase) -> Self {
        RecordingStore {
            inner,
            save_sizes: Mutex::new(Vec::new()),
            delete_sizes: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            overlapped: AtomicBool::new(false),
            fail_save_at: None,
        }
    }

    pub fn failing_at(inner: MemoryBase, call: usize) -> Self {
        let mut store = RecordingStore::new(inner);
        store.fail_save_at = Some(call);
        store
    }

    pub fn saves(&self) -> Vec<usize> {
        self.save_sizes.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<usize> {
        self.delete_sizes.lock().unwrap().clone()
    }

    pub fn saw_overlap(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn save_batch(
        &self,
        records: Vec<Record>,
        options: &CallOptions,
    ) -> Result<Vec<Record>> {
        let call = {
            let mut sizes = self.save_sizes.lock().unwrap();
            sizes.push(records.len());
            sizes.len() - 1
        };
        if self.fail_save_at == Some(call) {
            return Err(Error::Api {
                code: 142,
                message: "batch rejected".to_string(),
            });
        }
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        // Yield so an (incorrectly) concurrent second save would overlap here.
        tokio::task::yield_now().await;
        let saved = self.inner.save_batch(records, options).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        saved
    }

    async fn delete_batch(&self, records: &[Record], options: &CallOptions) -> Result<u64> {
        self.delete_sizes.lock().unwrap().push(records.len());
        self.inner.delete_batch(records, options).await
    }
}

/// Delegates to the in-memory schema store but refuses to create one
/// specific class with a non-conflict error.
pub struct ForbiddingSchemaStore {
    pub inner: MemoryBase,
    pub forbid: String,
}

#[async_trait]
impl SchemaStore for ForbiddingSchemaStore {
    async fn load_schema(&self) -> Result<SchemaSnapshot> {
        self.inner.load_schema().await
    }

    async fn add_class(&self, class: &str, schema: &ClassSchema) -> Result<()> {
        if class == self.forbid {
            return Err(Error::Api {
                code: 119,
                message: "operation forbidden".to_string(),
            });
        }
        self.inner.add_class(class, schema).await
    }

    async fn update_class(
        &self,
        class: &str,
        patch: &SchemaPatch,
        permissions: Option<&Permissions>,
    ) -> Result<()> {
        self.inner.update_class(class, patch, permissions).await
    }
}

/// Seed `count` records of `class` into the backend, returning them saved.
pub async fn seed_records(base: &MemoryBase, class: &str, count: usize) -> Vec<Record> {
    let records = (0..count)
        .map(|i| Record::new(class).with_field("seq", i as i64))
        .collect();
    base.save_batch(records, &CallOptions::default())
        .await
        .unwrap()
}
