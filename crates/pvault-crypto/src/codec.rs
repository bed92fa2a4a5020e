//! Selective record sealing: applies the field cipher to a record's
//! sensitive fields and leaves everything else in the clear.
//!
//! Which fields count as sensitive is schema-driven and passed in by the
//! caller, so a new category gets correct encryption behavior without this
//! module changing.

use std::collections::{BTreeMap, BTreeSet};

use pvault_core::{FieldValue, Record, VaultError};

use crate::cipher::{decrypt_field, encrypt_field};
use crate::kdf::DerivedKey;

/// Visible stand-in for a field whose envelope failed to decrypt.
pub const DECRYPT_FAILED_SENTINEL: &str = "[Decryption Failed]";

/// A record read back from storage, plus any per-field decrypt failures.
///
/// A failed field holds [`DECRYPT_FAILED_SENTINEL`] in the record so one
/// corrupted envelope never renders the whole record unusable; the original
/// error is kept here for the caller.
#[derive(Debug)]
pub struct OpenedRecord {
    pub record: Record,
    pub errors: BTreeMap<String, VaultError>,
}

impl OpenedRecord {
    pub fn intact(record: Record) -> Self {
        OpenedRecord {
            record,
            errors: BTreeMap::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Encrypt the named sensitive fields of `record` in place of their
/// plaintext values.
///
/// Only fields that are present, text-typed, and non-empty are sealed;
/// everything else (non-sensitive fields, tags, favorite flag, timestamps)
/// passes through unchanged. An absent or empty sensitive field stays
/// absent/empty, producing no envelope.
pub fn seal_fields(record: &Record, sensitive: &BTreeSet<String>, key: &DerivedKey) -> Record {
    let mut sealed = record.clone();
    for name in sensitive {
        if let Some(FieldValue::Text(plaintext)) = sealed.fields.get(name) {
            if !plaintext.is_empty() {
                let envelope = encrypt_field(plaintext, key);
                sealed.fields.insert(name.clone(), FieldValue::Text(envelope));
            }
        }
    }
    sealed
}

/// Decrypt the named sensitive fields of `record`.
///
/// Per-field failures do not abort the record: the failing field is replaced
/// with [`DECRYPT_FAILED_SENTINEL`] and the error collected, while the
/// remaining fields decrypt normally.
pub fn open_fields(record: &Record, sensitive: &BTreeSet<String>, key: &DerivedKey) -> OpenedRecord {
    let mut opened = record.clone();
    let mut errors = BTreeMap::new();

    for name in sensitive {
        let Some(FieldValue::Text(envelope)) = opened.fields.get(name) else {
            continue;
        };
        if envelope.is_empty() {
            continue;
        }
        match decrypt_field(envelope, key) {
            Ok(plaintext) => {
                opened.fields.insert(name.clone(), FieldValue::Text(plaintext));
            }
            Err(err) => {
                tracing::warn!(field = %name, %err, "field decryption failed");
                opened
                    .fields
                    .insert(name.clone(), FieldValue::text(DECRYPT_FAILED_SENTINEL));
                errors.insert(name.clone(), err);
            }
        }
    }

    OpenedRecord {
        record: opened,
        errors,
    }
}
