//! The bounded-query capability consumed by the traversal algorithms.

use crate::error::Result;
use crate::types::{CallOptions, Record};
use async_trait::async_trait;

/// A caller-constructed filter over one record class.
///
/// The traversal algorithms only use the capabilities below: a total match
/// count and bounded, offset retrieval. How the predicate itself is built
/// is the backend client's business.
#[async_trait]
pub trait RecordQuery: Send + Sync {
    /// Name of the class this query ranges over.
    fn class_name(&self) -> &str;

    /// Total number of currently-matching records.
    async fn count(&self, options: &CallOptions) -> Result<u64>;

    /// Up to `limit` matching records, skipping the first `skip`.
    async fn find_page(&self, skip: u64, limit: u64, options: &CallOptions)
    -> Result<Vec<Record>>;
}
