//! Basecamp - backend-client abstraction for the drover bulk utilities.
//!
//! The backend itself (an object store with classes, records, and schemas)
//! lives elsewhere; this crate defines the data model and the capability
//! traits the traversal algorithms in `drover` consume, plus a complete
//! in-memory implementation used by tests.

mod config;
mod error;
pub mod memory;
mod query;
mod schema;
mod store;
mod types;

pub use config::{BaseConfig, DEFAULT_PAGE_SIZE, DEFAULT_SAVE_CHUNK};
pub use error::{Error, Result};
pub use memory::{MemoryBase, MemoryQuery};
pub use query::RecordQuery;
pub use schema::{
    ClassSchema, FieldOp, FieldType, Permissions, SchemaPatch, SchemaSnapshot, SchemaStore,
};
pub use store::RecordStore;
pub use types::{CallOptions, Record, RecordRef};
