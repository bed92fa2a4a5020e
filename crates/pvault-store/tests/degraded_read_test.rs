//! Integration tests for degraded reads: one corrupted envelope must never
//! take down the rest of the vault.

use std::sync::Arc;

use pvault_core::{FieldValue, Record, VaultError};
use pvault_crypto::kdf::DerivedKey;
use pvault_crypto::DECRYPT_FAILED_SENTINEL;
use pvault_schema::CategoryRegistry;
use pvault_store::{MemoryBackend, RecordBackend, RecordStore};

fn test_key() -> DerivedKey {
    DerivedKey::from_bytes([42u8; 32])
}

fn login(service: &str, user: &str, password: &str) -> Record {
    Record::new("passwords")
        .with_field("serviceName", service)
        .with_field("username", user)
        .with_field("password", password)
}

/// Flip one hex digit in the ciphertext segment of a sealed field.
fn corrupt_envelope(record: &mut Record, field: &str) {
    let envelope = record.text(field).unwrap().to_string();
    let mut parts: Vec<String> = envelope.split(':').map(String::from).collect();
    let mut chars: Vec<char> = parts[2].chars().collect();
    chars[0] = if chars[0] == '0' { '1' } else { '0' };
    parts[2] = chars.into_iter().collect();
    record
        .fields
        .insert(field.to_string(), FieldValue::Text(parts.join(":")));
}

#[tokio::test]
async fn list_degrades_corrupted_record_and_keeps_the_rest() {
    let key = test_key();
    let backend = Arc::new(MemoryBackend::new());
    let store = RecordStore::new(backend.clone(), CategoryRegistry::with_builtins());

    store
        .create("alice", login("mail", "me@example.com", "alpha"), &key)
        .await
        .unwrap();
    let victim_id = store
        .create("alice", login("bank", "me@example.com", "bravo"), &key)
        .await
        .unwrap();
    store
        .create("alice", login("forum", "me@example.com", "charlie"), &key)
        .await
        .unwrap();

    // Corrupt the second record's password envelope behind the store's back.
    let mut sealed = backend.get("alice", &victim_id).await.unwrap();
    corrupt_envelope(&mut sealed, "password");
    backend.replace("alice", &victim_id, sealed).await.unwrap();

    let listed = store.list("alice", &key).await.unwrap();
    assert_eq!(listed.len(), 3, "corruption must not shrink the listing");

    let degraded: Vec<_> = listed.iter().filter(|r| r.is_degraded()).collect();
    assert_eq!(degraded.len(), 1);
    let victim = degraded[0];
    assert_eq!(victim.record.id, victim_id);
    assert_eq!(victim.record.text("password"), Some(DECRYPT_FAILED_SENTINEL));
    assert!(matches!(
        victim.record.text("serviceName"),
        Some("bank")
    ));
    assert!(matches!(
        victim.errors.get("password"),
        Some(VaultError::Integrity)
    ));

    let healthy_passwords: Vec<_> = listed
        .iter()
        .filter(|r| !r.is_degraded())
        .map(|r| r.record.text("password").unwrap().to_string())
        .collect();
    assert_eq!(healthy_passwords.len(), 2);
    assert!(healthy_passwords.contains(&"alpha".to_string()));
    assert!(healthy_passwords.contains(&"charlie".to_string()));
}

#[tokio::test]
async fn get_surfaces_field_error_without_failing() {
    let key = test_key();
    let backend = Arc::new(MemoryBackend::new());
    let store = RecordStore::new(backend.clone(), CategoryRegistry::with_builtins());

    let id = store
        .create("alice", login("mail", "me@example.com", "alpha"), &key)
        .await
        .unwrap();

    let mut sealed = backend.get("alice", &id).await.unwrap();
    corrupt_envelope(&mut sealed, "password");
    backend.replace("alice", &id, sealed).await.unwrap();

    let opened = store.get("alice", &id, &key).await.unwrap();
    assert!(opened.is_degraded());
    assert_eq!(opened.record.text("password"), Some(DECRYPT_FAILED_SENTINEL));
    assert_eq!(opened.record.text("username"), Some("me@example.com"));
}

#[tokio::test]
async fn wrong_key_degrades_every_sensitive_field() {
    let key = test_key();
    let wrong_key = DerivedKey::from_bytes([1u8; 32]);
    let store = RecordStore::new(MemoryBackend::new(), CategoryRegistry::with_builtins());

    store
        .create("alice", login("mail", "me@example.com", "alpha"), &key)
        .await
        .unwrap();

    let listed = store.list("alice", &wrong_key).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_degraded());
    assert_eq!(
        listed[0].record.text("password"),
        Some(DECRYPT_FAILED_SENTINEL)
    );
    assert_eq!(
        listed[0].record.text("serviceName"),
        Some("mail"),
        "clear fields are unaffected by the wrong key"
    );
}
