//! RecordStore: CRUD orchestration over the persistence collaborator.
//!
//! The store holds no record state of its own. Each operation is atomic
//! with respect to the crypto layer: a record is either fully sealed/opened
//! or not touched at all.

use std::collections::BTreeSet;
use std::sync::Arc;

use pvault_core::{Record, VaultError, VaultResult};
use pvault_crypto::codec::{open_fields, seal_fields, OpenedRecord};
use pvault_crypto::kdf::DerivedKey;
use pvault_schema::{is_duplicate_of, CategoryRegistry};

use crate::audit::{AuditAction, AuditEvent, AuditSink};
use crate::backend::RecordBackend;

pub struct RecordStore<B: RecordBackend> {
    backend: B,
    registry: CategoryRegistry,
    audit: Option<Arc<dyn AuditSink>>,
}

impl<B: RecordBackend> RecordStore<B> {
    /// The registry is injected here; the store never reads schema state
    /// from anywhere else.
    pub fn new(backend: B, registry: CategoryRegistry) -> Self {
        RecordStore {
            backend,
            registry,
            audit: None,
        }
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Create a record: validate against its schema, reject identity
    /// duplicates, seal sensitive fields, and hand the envelope set to the
    /// persistence collaborator, which assigns the id and timestamps.
    ///
    /// The duplicate scan decrypts every existing record of the category,
    /// O(n) per create. It runs unlocked against the collaborator, so two
    /// racing creates of the same identity can both land; a backend with a
    /// uniqueness constraint closes that gap.
    pub async fn create(
        &self,
        scope: &str,
        record: Record,
        key: &DerivedKey,
    ) -> VaultResult<String> {
        let schema = self
            .registry
            .resolve(&record.category)
            .ok_or_else(|| VaultError::Schema(record.category.clone()))?;
        pvault_schema::validate_record(schema, &record)?;
        let sensitive = schema.sensitive_field_names();

        for existing in self.backend.list(scope).await? {
            if existing.category != record.category {
                continue;
            }
            let opened = open_fields(&existing, &sensitive, key);
            if is_duplicate_of(&record, &opened.record) {
                return Err(VaultError::DuplicateRecord(format!(
                    "a {} item with the same identity already exists",
                    schema.label
                )));
            }
        }

        let sealed = seal_fields(&record, &sensitive, key);
        let stored = self.backend.insert(scope, sealed).await?;
        tracing::debug!(scope, id = %stored.id, category = %record.category, "record created");
        self.emit(scope, AuditAction::CreateItem, Some(&stored.id));
        Ok(stored.id)
    }

    /// Full-record replace: the entire field set is re-sealed, making an
    /// update equivalent to delete + recreate at the crypto layer.
    pub async fn update(
        &self,
        scope: &str,
        id: &str,
        record: Record,
        key: &DerivedKey,
    ) -> VaultResult<()> {
        let schema = self
            .registry
            .resolve(&record.category)
            .ok_or_else(|| VaultError::Schema(record.category.clone()))?;
        pvault_schema::validate_record(schema, &record)?;

        let sealed = seal_fields(&record, &schema.sensitive_field_names(), key);
        self.backend.replace(scope, id, sealed).await?;
        tracing::debug!(scope, id, "record updated");
        self.emit(scope, AuditAction::UpdateItem, Some(id));
        Ok(())
    }

    pub async fn delete(&self, scope: &str, id: &str) -> VaultResult<()> {
        self.backend.delete(scope, id).await?;
        tracing::debug!(scope, id, "record deleted");
        self.emit(scope, AuditAction::DeleteItem, Some(id));
        Ok(())
    }

    /// Fetch and open one record.
    pub async fn get(&self, scope: &str, id: &str, key: &DerivedKey) -> VaultResult<OpenedRecord> {
        let sealed = self.backend.get(scope, id).await?;
        let opened = self.open(&sealed, key);
        self.emit(scope, AuditAction::ViewItem, Some(id));
        Ok(opened)
    }

    /// List and open every record in the scope.
    ///
    /// Per-field decrypt failures degrade the affected records (sentinel
    /// value + error entry) instead of aborting the listing; a record whose
    /// category is unknown to the registry passes through still sealed.
    pub async fn list(&self, scope: &str, key: &DerivedKey) -> VaultResult<Vec<OpenedRecord>> {
        let sealed = self.backend.list(scope).await?;
        Ok(sealed.iter().map(|record| self.open(record, key)).collect())
    }

    fn open(&self, sealed: &Record, key: &DerivedKey) -> OpenedRecord {
        let sensitive = self
            .registry
            .sensitive_field_names(&sealed.category)
            .unwrap_or_else(|| {
                tracing::warn!(
                    category = %sealed.category,
                    id = %sealed.id,
                    "record references unknown category; leaving fields sealed"
                );
                BTreeSet::new()
            });
        open_fields(sealed, &sensitive, key)
    }

    fn emit(&self, scope: &str, action: AuditAction, record_id: Option<&str>) {
        if let Some(sink) = &self.audit {
            sink.record(AuditEvent::new(scope, action, record_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::memory::MemoryBackend;

    fn test_key() -> DerivedKey {
        DerivedKey::from_bytes([5u8; 32])
    }

    fn store() -> RecordStore<MemoryBackend> {
        RecordStore::new(MemoryBackend::new(), CategoryRegistry::with_builtins())
    }

    fn login(service: &str, user: &str) -> Record {
        Record::new("passwords")
            .with_field("serviceName", service)
            .with_field("username", user)
            .with_field("password", "hunter2")
    }

    #[tokio::test]
    async fn test_unknown_category_is_schema_error() {
        let key = test_key();
        let result = store().create("alice", Record::new("not_a_category"), &key).await;
        assert!(matches!(result, Err(VaultError::Schema(c)) if c == "not_a_category"));
    }

    #[tokio::test]
    async fn test_invalid_record_rejected_before_write() {
        let key = test_key();
        let store = store();
        let missing_password = Record::new("passwords")
            .with_field("serviceName", "mail")
            .with_field("username", "me@example.com");

        let result = store.create("alice", missing_password, &key).await;
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert!(store.list("alice", &key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sensitive_fields_sealed_at_rest() {
        let key = test_key();
        let backend = Arc::new(MemoryBackend::new());
        let store = RecordStore::new(backend.clone(), CategoryRegistry::with_builtins());

        let id = store
            .create("alice", login("mail", "me@example.com"), &key)
            .await
            .unwrap();

        let at_rest = backend.get("alice", &id).await.unwrap();
        let envelope = at_rest.text("password").unwrap();
        assert_ne!(envelope, "hunter2");
        assert_eq!(envelope.split(':').count(), 3);
        assert_eq!(at_rest.text("serviceName"), Some("mail"), "clear field stays clear");
    }

    #[tokio::test]
    async fn test_update_is_full_replace() {
        let key = test_key();
        let store = store();
        let id = store
            .create("alice", login("mail", "me@example.com"), &key)
            .await
            .unwrap();

        let mut replacement = login("mail", "me@example.com");
        replacement.fields.insert("password".into(), "correct-horse".into());
        store.update("alice", &id, replacement, &key).await.unwrap();

        let opened = store.get("alice", &id, &key).await.unwrap();
        assert_eq!(opened.record.text("password"), Some("correct-horse"));
    }

    #[tokio::test]
    async fn test_update_missing_id_not_found() {
        let key = test_key();
        let result = store()
            .update("alice", "ghost", login("mail", "me@example.com"), &key)
            .await;
        assert!(matches!(result, Err(VaultError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_audit_trail_emitted() {
        let key = test_key();
        let sink = Arc::new(MemoryAuditSink::new());
        let store = RecordStore::new(MemoryBackend::new(), CategoryRegistry::with_builtins())
            .with_audit(sink.clone());

        let id = store
            .create("alice", login("mail", "me@example.com"), &key)
            .await
            .unwrap();
        store.delete("alice", &id).await.unwrap();

        let actions: Vec<AuditAction> = sink.events().iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::CreateItem, AuditAction::DeleteItem]);
    }

    #[tokio::test]
    async fn test_unknown_category_record_listed_sealed() {
        let key = test_key();
        let backend = Arc::new(MemoryBackend::new());
        // Registered under a registry that knows "api_keys"...
        let mut registry = CategoryRegistry::with_builtins();
        registry
            .register(pvault_schema::CategorySchema::new(
                "api_keys",
                "API Keys",
                vec![pvault_schema::FieldSpec::new(
                    "key",
                    "Key",
                    pvault_schema::FieldType::Password,
                )
                .sensitive()],
            ))
            .unwrap();
        let writer = RecordStore::new(backend.clone(), registry);
        writer
            .create(
                "alice",
                Record::new("api_keys").with_field("key", "s3cr3t"),
                &key,
            )
            .await
            .unwrap();

        // ...then listed by a store that only knows the built-ins.
        let reader = RecordStore::new(backend, CategoryRegistry::with_builtins());
        let listed = reader.list("alice", &key).await.unwrap();

        assert_eq!(listed.len(), 1);
        let envelope = listed[0].record.text("key").unwrap();
        assert_eq!(envelope.split(':').count(), 3, "left sealed, not garbled");
        assert!(!listed[0].is_degraded());
    }
}
