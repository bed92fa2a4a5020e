//! In-memory persistence backend for tests and ephemeral vaults.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pvault_core::{Record, VaultError, VaultResult};

use crate::backend::RecordBackend;

#[derive(Default)]
pub struct MemoryBackend {
    scopes: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    async fn insert(&self, scope: &str, mut record: Record) -> VaultResult<Record> {
        let now = Utc::now();
        record.id = Uuid::new_v4().to_string();
        record.created_at = Some(now);
        record.updated_at = Some(now);

        let mut scopes = self.scopes.write().await;
        scopes
            .entry(scope.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn replace(&self, scope: &str, id: &str, mut record: Record) -> VaultResult<Record> {
        let mut scopes = self.scopes.write().await;
        let records = scopes
            .get_mut(scope)
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))?;

        record.id = id.to_string();
        record.created_at = slot.created_at;
        record.updated_at = Some(Utc::now());
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, scope: &str, id: &str) -> VaultResult<()> {
        let mut scopes = self.scopes.write().await;
        let records = scopes
            .get_mut(scope)
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(VaultError::NotFound(format!("record {id}")));
        }
        Ok(())
    }

    async fn get(&self, scope: &str, id: &str) -> VaultResult<Record> {
        let scopes = self.scopes.read().await;
        scopes
            .get(scope)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))
    }

    async fn list(&self, scope: &str) -> VaultResult<Vec<Record>> {
        let scopes = self.scopes.read().await;
        let mut records = scopes.get(scope).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let backend = MemoryBackend::new();
        let stored = backend
            .insert("alice", Record::new("notes"))
            .await
            .unwrap();

        assert!(!stored.id.is_empty());
        assert!(stored.created_at.is_some());
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let backend = MemoryBackend::new();
        backend.insert("alice", Record::new("notes")).await.unwrap();

        assert_eq!(backend.list("alice").await.unwrap().len(), 1);
        assert!(backend.list("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_preserves_created_at() {
        let backend = MemoryBackend::new();
        let stored = backend.insert("alice", Record::new("notes")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let replaced = backend
            .replace("alice", &stored.id, Record::new("notes"))
            .await
            .unwrap();

        assert_eq!(replaced.created_at, stored.created_at);
        assert!(replaced.updated_at > stored.updated_at);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.get("alice", "nope").await,
            Err(VaultError::NotFound(_))
        ));
        assert!(matches!(
            backend.delete("alice", "nope").await,
            Err(VaultError::NotFound(_))
        ));
        assert!(matches!(
            backend.replace("alice", "nope", Record::new("notes")).await,
            Err(VaultError::NotFound(_))
        ));
    }
}
