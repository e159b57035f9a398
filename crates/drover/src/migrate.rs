//! Schema reconciliation: bring remote class schemas in line with desired
//! ones using minimal field-level patches.

use basecamp::{
    ClassSchema, Error, FieldOp, Permissions, Result, SchemaPatch, SchemaSnapshot, SchemaStore,
};
use futures::future::join_all;
use std::collections::BTreeSet;

/// Fields the backend manages on every class; never patched.
const SYSTEM_FIELDS: &[&str] = &["objectId", "createdAt", "updatedAt", "ACL"];

/// The backend's built-in user class carries account fields that must never
/// be auto-patched, on top of the universal system fields.
const USER_CLASS: &str = "_User";
const USER_ACCOUNT_FIELDS: &[&str] = &["username", "password", "email", "emailVerified", "authData"];

/// The set of field names reconciliation must leave alone for `class`.
pub fn protected_fields(class: &str) -> BTreeSet<&'static str> {
    let mut protected: BTreeSet<&'static str> = SYSTEM_FIELDS.iter().copied().collect();
    if class == USER_CLASS {
        protected.extend(USER_ACCOUNT_FIELDS.iter().copied());
    }
    protected
}

/// Computes the minimal patch turning `remote` into `desired`.
///
/// Remote fields absent from the desired schema are deleted and desired
/// fields absent from the remote schema are inserted; names in `protected`
/// are never touched in either direction. Fields present on both sides are
/// left alone, so reconciling an already-reconciled schema yields an empty
/// patch.
pub fn schema_patch(
    remote: &ClassSchema,
    desired: &ClassSchema,
    protected: &BTreeSet<&str>,
) -> SchemaPatch {
    let mut patch = SchemaPatch::new();
    for field in remote.keys() {
        if !desired.contains_key(field) && !protected.contains(field.as_str()) {
            patch.insert(field.clone(), FieldOp::Delete);
        }
    }
    for (field, descriptor) in desired {
        if !remote.contains_key(field) && !protected.contains(field.as_str()) {
            patch.insert(field.clone(), FieldOp::Put(descriptor.clone()));
        }
    }
    patch
}

/// One desired class: name, schema, and optional class-level permissions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSpec {
    pub name: String,
    pub schema: ClassSchema,
    pub permissions: Option<Permissions>,
}

impl ClassSpec {
    pub fn new(name: impl Into<String>, schema: ClassSchema) -> Self {
        ClassSpec {
            name: name.into(),
            schema,
            permissions: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// What reconciliation did to one class.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// The class did not exist and was created.
    Created,
    /// The class existed; only permissions were (re)applied.
    PermissionsApplied,
    /// The class existed; this field patch was submitted with permissions.
    Patched(SchemaPatch),
}

/// Per-class reconciliation outcome.
#[derive(Debug)]
pub struct ClassSyncReport {
    pub class: String,
    pub result: Result<SyncAction>,
}

/// Ensures each class in `classes` exists remotely with at least the
/// desired schema and permissions.
///
/// The remote schema is loaded once up front; a failure there fails the
/// whole call. After that every class reconciles as an independent,
/// concurrently awaited task: one class's failure appears only in its own
/// report. When `update_existing` is false, existing classes get their
/// permissions reapplied but their fields are left untouched.
pub async fn sync_classes(
    schemas: &dyn SchemaStore,
    classes: &[ClassSpec],
    update_existing: bool,
) -> Result<Vec<ClassSyncReport>> {
    let snapshot = schemas.load_schema().await?;

    let reports = join_all(classes.iter().map(|spec| {
        let snapshot = &snapshot;
        async move {
            let result = sync_one(schemas, snapshot, spec, update_existing).await;
            match &result {
                Ok(action) => {
                    let kind = match action {
                        SyncAction::Created => "created",
                        SyncAction::PermissionsApplied => "permissions applied",
                        SyncAction::Patched(patch) => {
                            diagnostics::log_debug!(
                                "class {class}: patch touches {fields} fields",
                                class: spec.name.as_str(),
                                fields: patch.len()
                            );
                            "patched"
                        }
                    };
                    diagnostics::log_info!(
                        "class {class}: {kind}",
                        class: spec.name.as_str(),
                        kind: kind
                    );
                }
                Err(err) => {
                    let message = err.to_string();
                    diagnostics::log_warn!(
                        "class {class}: reconciliation failed: {message}",
                        class: spec.name.as_str(),
                        message: message
                    );
                }
            }
            ClassSyncReport {
                class: spec.name.clone(),
                result,
            }
        }
    }))
    .await;

    Ok(reports)
}

async fn sync_one(
    schemas: &dyn SchemaStore,
    snapshot: &SchemaSnapshot,
    spec: &ClassSpec,
    update_existing: bool,
) -> Result<SyncAction> {
    match schemas.add_class(&spec.name, &spec.schema).await {
        Ok(()) => {
            schemas
                .update_class(&spec.name, &SchemaPatch::new(), spec.permissions.as_ref())
                .await?;
            Ok(SyncAction::Created)
        }
        Err(Error::ClassExists { .. }) if update_existing => {
            let empty = ClassSchema::new();
            let remote = snapshot.class(&spec.name).unwrap_or(&empty);
            let patch = schema_patch(remote, &spec.schema, &protected_fields(&spec.name));
            schemas
                .update_class(&spec.name, &patch, spec.permissions.as_ref())
                .await?;
            Ok(SyncAction::Patched(patch))
        }
        Err(Error::ClassExists { .. }) => {
            schemas
                .update_class(&spec.name, &SchemaPatch::new(), spec.permissions.as_ref())
                .await?;
            Ok(SyncAction::PermissionsApplied)
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecamp::FieldType;

    fn schema_of(fields: &[(&str, FieldType)]) -> ClassSchema {
        fields
            .iter()
            .map(|(name, descriptor)| (name.to_string(), descriptor.clone()))
            .collect()
    }

    #[test]
    fn patch_deletes_and_inserts_by_set_difference() {
        let remote = schema_of(&[("a", FieldType::String), ("c", FieldType::Number)]);
        let desired = schema_of(&[("a", FieldType::String), ("b", FieldType::Boolean)]);

        let patch = schema_patch(&remote, &desired, &BTreeSet::new());
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("c"), Some(&FieldOp::Delete));
        assert_eq!(patch.get("b"), Some(&FieldOp::Put(FieldType::Boolean)));
        assert!(!patch.contains_key("a"));
    }

    #[test]
    fn patch_of_identical_schemas_is_empty() {
        let schema = schema_of(&[("a", FieldType::String), ("b", FieldType::Date)]);
        let patch = schema_patch(&schema, &schema, &protected_fields("Song"));
        assert!(patch.is_empty());
    }

    #[test]
    fn protected_fields_survive_reconciliation() {
        let remote = schema_of(&[
            ("createdAt", FieldType::Date),
            ("stale", FieldType::String),
        ]);
        let desired = ClassSchema::new();

        let patch = schema_patch(&remote, &desired, &protected_fields("Song"));
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("stale"), Some(&FieldOp::Delete));
    }

    #[test]
    fn user_class_protects_account_fields() {
        let remote = schema_of(&[
            ("emailVerified", FieldType::Boolean),
            ("authData", FieldType::Object),
            ("nickname", FieldType::String),
        ]);
        let desired = ClassSchema::new();

        let patch = schema_patch(&remote, &desired, &protected_fields(USER_CLASS));
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("nickname"), Some(&FieldOp::Delete));
    }

    #[test]
    fn ordinary_classes_may_delete_account_like_names() {
        // The wider protection applies to _User only.
        let remote = schema_of(&[("emailVerified", FieldType::Boolean)]);
        let desired = ClassSchema::new();

        let patch = schema_patch(&remote, &desired, &protected_fields("Subscriber"));
        assert_eq!(patch.get("emailVerified"), Some(&FieldOp::Delete));
    }

    #[test]
    fn protected_set_is_wider_for_the_user_class() {
        let user = protected_fields(USER_CLASS);
        let other = protected_fields("Song");
        assert!(user.is_superset(&other));
        assert!(user.contains("password"));
        assert!(!other.contains("password"));
        assert!(other.contains("objectId"));
    }
}
