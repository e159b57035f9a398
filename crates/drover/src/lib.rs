//! Drover - bulk-record utilities over a class/record backend.
//!
//! Three independent algorithms with no shared state, composed only by the
//! caller: unbounded paged retrieval ([`find_all`]), bounded-round deletion
//! ([`delete_all`]), chunked bulk save ([`save_all_in_chunks`]), and the
//! schema reconciler ([`sync_classes`]). All of them take their backend
//! collaborators as explicit trait handles from `basecamp`; there is no
//! global client state.

mod fetch;
mod migrate;
mod purge;
mod save;

pub use fetch::{find_all, find_all_default};
pub use migrate::{
    ClassSpec, ClassSyncReport, SyncAction, protected_fields, schema_patch, sync_classes,
};
pub use purge::{delete_all, delete_all_default};
pub use save::{save_all, save_all_in_chunks};
