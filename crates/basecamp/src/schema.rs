//! Class schema model and the schema-storage capability trait.

use crate::error::Result;
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-type descriptor, tagged the way the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    File,
    GeoPoint,
    Object,
    Array,
    Pointer {
        #[serde(rename = "targetClass")]
        target_class: String,
    },
    Relation {
        #[serde(rename = "targetClass")]
        target_class: String,
    },
}

/// Field name to descriptor mapping for one class.
pub type ClassSchema = BTreeMap<String, FieldType>;

/// Class-level permissions, forwarded to the backend untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub Value);

/// One entry in a schema patch: insert a field or remove an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    /// Add this field with the given descriptor.
    Put(FieldType),
    /// Remove this field from the class.
    Delete,
}

impl Serialize for FieldOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldOp::Put(descriptor) => descriptor.serialize(serializer),
            FieldOp::Delete => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("__op", "Delete")?;
                map.end()
            }
        }
    }
}

/// Field name to operation mapping: the delta that reconciles one remote
/// class schema toward a desired one.
pub type SchemaPatch = BTreeMap<String, FieldOp>;

/// Remote schema state, loaded once per reconciliation call and read many
/// times within it. Stale relative to concurrent external writers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub classes: BTreeMap<String, ClassSchema>,
}

impl SchemaSnapshot {
    pub fn class(&self, name: &str) -> Option<&ClassSchema> {
        self.classes.get(name)
    }
}

/// Schema-storage capability supplied by the backend client.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Loads the full remote schema.
    async fn load_schema(&self) -> Result<SchemaSnapshot>;

    /// Creates a class with the given schema.
    ///
    /// Fails with [`crate::Error::ClassExists`] when the class is already
    /// present; all other failures propagate unchanged.
    async fn add_class(&self, class: &str, schema: &ClassSchema) -> Result<()>;

    /// Applies a field patch and/or permissions to an existing class.
    ///
    /// An empty patch is a permissions-only update.
    async fn update_class(
        &self,
        class: &str,
        patch: &SchemaPatch,
        permissions: Option<&Permissions>,
    ) -> Result<()>;
}
