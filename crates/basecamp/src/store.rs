//! Batch persistence primitives supplied by the backend client.

use crate::error::Result;
use crate::types::{CallOptions, Record};
use async_trait::async_trait;

/// Bulk save/delete capability.
///
/// Each call is atomic per batch from this library's point of view; there is
/// no cross-batch transaction, so partial progress across batches is never
/// rolled back.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a batch of records (upsert by id), returning the saved
    /// records with backend-assigned ids filled in.
    async fn save_batch(&self, records: Vec<Record>, options: &CallOptions)
    -> Result<Vec<Record>>;

    /// Deletes a batch of records, returning the number actually deleted.
    async fn delete_batch(&self, records: &[Record], options: &CallOptions) -> Result<u64>;
}
