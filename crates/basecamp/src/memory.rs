//! In-memory backend: a full implementation of the capability traits for
//! tests and offline experimentation.
//!
//! Records are kept per class in insertion order, so paging over a memory
//! query is deterministic. Saves upsert by id; records saved without an id
//! get a sequential one assigned.

use crate::error::{Error, Result};
use crate::query::RecordQuery;
use crate::schema::{ClassSchema, FieldOp, Permissions, SchemaPatch, SchemaSnapshot, SchemaStore};
use crate::store::RecordStore;
use crate::types::{CallOptions, Record};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<String, Vec<Record>>,
    schemas: BTreeMap<String, ClassSchema>,
    permissions: BTreeMap<String, Permissions>,
    next_id: u64,
}

/// Shared in-memory backend handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryBase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBase {
    pub fn new() -> Self {
        MemoryBase::default()
    }

    /// A query matching every record of `class`.
    pub fn query(&self, class: impl Into<String>) -> MemoryQuery {
        MemoryQuery {
            base: self.clone(),
            class: class.into(),
            filter: None,
        }
    }

    /// A query matching records of `class` whose `field` equals `value`.
    pub fn query_eq(
        &self,
        class: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> MemoryQuery {
        MemoryQuery {
            base: self.clone(),
            class: class.into(),
            filter: Some((field.into(), value.into())),
        }
    }

    /// Snapshot of all records currently stored in `class`, for assertions.
    pub async fn records_in(&self, class: &str) -> Vec<Record> {
        let state = self.state.lock().await;
        state.records.get(class).cloned().unwrap_or_default()
    }

    /// Permissions last applied to `class`, for assertions.
    pub async fn permissions_of(&self, class: &str) -> Option<Permissions> {
        let state = self.state.lock().await;
        state.permissions.get(class).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryBase {
    async fn save_batch(
        &self,
        records: Vec<Record>,
        _options: &CallOptions,
    ) -> Result<Vec<Record>> {
        let mut state = self.state.lock().await;
        let mut saved = Vec::with_capacity(records.len());
        for mut record in records {
            if record.id.is_none() {
                state.next_id += 1;
                record.id = Some(format!("mem{:06}", state.next_id));
            }
            let stored = state.records.entry(record.class.clone()).or_default();
            if let Some(existing) = stored.iter_mut().find(|r| r.id == record.id) {
                *existing = record.clone();
            } else {
                stored.push(record.clone());
            }
            saved.push(record);
        }
        Ok(saved)
    }

    async fn delete_batch(&self, records: &[Record], _options: &CallOptions) -> Result<u64> {
        let mut state = self.state.lock().await;
        let mut deleted = 0;
        for record in records {
            let Some(id) = record.id.as_deref() else {
                continue;
            };
            if let Some(stored) = state.records.get_mut(&record.class) {
                let before = stored.len();
                stored.retain(|r| r.id.as_deref() != Some(id));
                deleted += (before - stored.len()) as u64;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl SchemaStore for MemoryBase {
    async fn load_schema(&self) -> Result<SchemaSnapshot> {
        let state = self.state.lock().await;
        Ok(SchemaSnapshot {
            classes: state.schemas.clone(),
        })
    }

    async fn add_class(&self, class: &str, schema: &ClassSchema) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.schemas.contains_key(class) {
            return Err(Error::ClassExists {
                class: class.to_string(),
            });
        }
        state.schemas.insert(class.to_string(), schema.clone());
        Ok(())
    }

    async fn update_class(
        &self,
        class: &str,
        patch: &SchemaPatch,
        permissions: Option<&Permissions>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some(schema) = state.schemas.get_mut(class) else {
            return Err(Error::Api {
                code: 103,
                message: format!("class {class} does not exist"),
            });
        };
        for (field, op) in patch {
            match op {
                FieldOp::Put(descriptor) => {
                    schema.insert(field.clone(), descriptor.clone());
                }
                FieldOp::Delete => {
                    schema.remove(field);
                }
            }
        }
        if let Some(perms) = permissions {
            state.permissions.insert(class.to_string(), perms.clone());
        }
        Ok(())
    }
}

/// Equality-filtered, insertion-ordered query over a [`MemoryBase`] class.
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    base: MemoryBase,
    class: String,
    filter: Option<(String, Value)>,
}

impl MemoryQuery {
    fn matches(&self, record: &Record) -> bool {
        match &self.filter {
            Some((field, value)) => record.field(field) == Some(value),
            None => true,
        }
    }
}

#[async_trait]
impl RecordQuery for MemoryQuery {
    fn class_name(&self) -> &str {
        &self.class
    }

    async fn count(&self, _options: &CallOptions) -> Result<u64> {
        let state = self.base.state.lock().await;
        let count = state
            .records
            .get(&self.class)
            .map(|records| records.iter().filter(|r| self.matches(r)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn find_page(
        &self,
        skip: u64,
        limit: u64,
        _options: &CallOptions,
    ) -> Result<Vec<Record>> {
        let state = self.base.state.lock().await;
        let page = state
            .records
            .get(&self.class)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| self.matches(r))
                    .skip(skip as usize)
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(page)
    }
}
