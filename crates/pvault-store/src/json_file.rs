//! Single-file JSON persistence backend.
//!
//! The whole vault loads into memory on every operation and flushes back
//! atomically via temp file + rename. Fine for the personal-vault record
//! counts this is built for; a heavier deployment swaps in another
//! [`RecordBackend`](crate::backend::RecordBackend).

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use pvault_core::{Record, VaultError, VaultResult};

use crate::backend::RecordBackend;

#[derive(Debug, Default, Serialize, Deserialize)]
struct VaultFile {
    scopes: HashMap<String, Vec<Record>>,
}

pub struct JsonFileBackend {
    path: PathBuf,
    // Serializes load-modify-flush cycles against this file.
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> VaultResult<VaultFile> {
        if !self.path.exists() {
            return Ok(VaultFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| VaultError::Storage(format!("parsing {}: {e}", self.path.display())))
    }

    fn flush(&self, file: &VaultFile) -> VaultResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| VaultError::Storage(format!("serializing vault: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl RecordBackend for JsonFileBackend {
    async fn insert(&self, scope: &str, mut record: Record) -> VaultResult<Record> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load()?;

        let now = Utc::now();
        record.id = Uuid::new_v4().to_string();
        record.created_at = Some(now);
        record.updated_at = Some(now);

        file.scopes
            .entry(scope.to_string())
            .or_default()
            .push(record.clone());
        self.flush(&file)?;
        Ok(record)
    }

    async fn replace(&self, scope: &str, id: &str, mut record: Record) -> VaultResult<Record> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load()?;

        let records = file
            .scopes
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

        self.flush(&file)?;
        Ok(record)
    }

    async fn delete(&self, scope: &str, id: &str) -> VaultResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load()?;

        let records = file
            .scopes
            .get_mut(scope)
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(VaultError::NotFound(format!("record {id}")));
        }

        self.flush(&file)?;
        Ok(())
    }

    async fn get(&self, scope: &str, id: &str) -> VaultResult<Record> {
        let file = self.load()?;
        file.scopes
            .get(scope)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| VaultError::NotFound(format!("record {id}")))
    }

    async fn list(&self, scope: &str) -> VaultResult<Vec<Record>> {
        let file = self.load()?;
        let mut records = file.scopes.get(scope).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn backend(dir: &Path) -> JsonFileBackend {
        JsonFileBackend::new(dir.join("vault.json"))
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let stored = {
            let backend = backend(dir.path());
            backend
                .insert("alice", Record::new("notes").with_field("title", "persisted"))
                .await
                .unwrap()
        };

        let reopened = backend(dir.path());
        let fetched = reopened.get("alice", &stored.id).await.unwrap();
        assert_eq!(fetched.text("title"), Some("persisted"));
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path());
        assert!(backend.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path());
        let stored = backend.insert("alice", Record::new("notes")).await.unwrap();
        backend.delete("alice", &stored.id).await.unwrap();

        let reopened = JsonFileBackend::new(dir.path().join("vault.json"));
        assert!(reopened.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path());
        backend.insert("alice", Record::new("notes")).await.unwrap();

        assert!(dir.path().join("vault.json").exists());
        assert!(!dir.path().join("vault.json.tmp").exists());
    }
}
