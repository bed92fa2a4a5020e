//! The persistence collaborator: a string-keyed record store.
//!
//! The core assumes nothing about the medium beyond these five operations.
//! Records handed to a backend already have their sensitive fields sealed;
//! a backend never sees plaintext secrets and never touches envelopes.

use std::sync::Arc;

use async_trait::async_trait;

use pvault_core::{Record, VaultResult};

/// Storage collaborator keyed by `(scope, id)`, where `scope` isolates one
/// user's records from another's.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Store a new record, assigning its id and timestamps.
    /// Returns the record as stored.
    async fn insert(&self, scope: &str, record: Record) -> VaultResult<Record>;

    /// Replace the record with the given id in full, refreshing
    /// `updated_at` and preserving `created_at`.
    /// Fails with `NotFound` if the id is unknown.
    async fn replace(&self, scope: &str, id: &str, record: Record) -> VaultResult<Record>;

    /// Fails with `NotFound` if the id is unknown.
    async fn delete(&self, scope: &str, id: &str) -> VaultResult<()>;

    /// Fails with `NotFound` if the id is unknown.
    async fn get(&self, scope: &str, id: &str) -> VaultResult<Record>;

    /// All records in the scope, newest first.
    async fn list(&self, scope: &str) -> VaultResult<Vec<Record>>;
}

#[async_trait]
impl<B: RecordBackend + ?Sized> RecordBackend for Arc<B> {
    async fn insert(&self, scope: &str, record: Record) -> VaultResult<Record> {
        (**self).insert(scope, record).await
    }

    async fn replace(&self, scope: &str, id: &str, record: Record) -> VaultResult<Record> {
        (**self).replace(scope, id, record).await
    }

    async fn delete(&self, scope: &str, id: &str) -> VaultResult<()> {
        (**self).delete(scope, id).await
    }

    async fn get(&self, scope: &str, id: &str) -> VaultResult<Record> {
        (**self).get(scope, id).await
    }

    async fn list(&self, scope: &str) -> VaultResult<Vec<Record>> {
        (**self).list(scope).await
    }
}
