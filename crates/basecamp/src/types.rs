//! Record and pointer types shared by every backend operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One stored object: a class name, an optional backend-assigned id, and a
/// mapping of field name to value.
///
/// The traversal algorithms never interpret field contents; they only move
/// records between the backend and the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Backend-assigned identifier, `None` until first saved.
    #[serde(rename = "objectId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the class this record belongs to.
    #[serde(rename = "className")]
    pub class: String,

    /// Field name to value mapping.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// A new, unsaved record of the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Record {
            id: None,
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A pointer to this record, if it has been saved.
    pub fn reference(&self) -> Option<RecordRef> {
        self.id
            .as_ref()
            .map(|id| RecordRef::new(self.class.clone(), id.clone()))
    }
}

/// A pointer to a record in some class, in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    #[serde(rename = "__type")]
    kind: PointerTag,

    #[serde(rename = "className")]
    pub class: String,

    #[serde(rename = "objectId")]
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PointerTag {
    Pointer,
}

impl RecordRef {
    pub fn new(class: impl Into<String>, id: impl Into<String>) -> Self {
        RecordRef {
            kind: PointerTag::Pointer,
            class: class.into(),
            id: id.into(),
        }
    }

    /// One pointer per id, all referencing the same class.
    pub fn many<I, S>(class: &str, ids: I) -> Vec<RecordRef>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ids.into_iter()
            .map(|id| RecordRef::new(class, id))
            .collect()
    }
}

/// Per-call execution options forwarded to every backend primitive.
///
/// The traversal algorithms treat these as opaque: they are handed to the
/// backend unchanged on every page fetch, batch save, and batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Bypass class-level permissions using the master key.
    pub master_key: bool,
    /// Act on behalf of an authenticated session.
    pub session_token: Option<String>,
}

impl CallOptions {
    pub fn master_key() -> Self {
        CallOptions {
            master_key: true,
            session_token: None,
        }
    }
}
