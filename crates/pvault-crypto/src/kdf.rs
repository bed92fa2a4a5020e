//! Key derivation: PBKDF2-SHA256 identity secret → session key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{DEFAULT_PBKDF2_ITERATIONS, KEY_SIZE};

/// A 256-bit symmetric key derived from an identity secret via PBKDF2-SHA256.
///
/// Never persisted; zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from an identity secret and an application-wide salt
/// with the default iteration count.
///
/// Deterministic: the same inputs always yield the same key, so a user can
/// re-derive their key on any device without it ever being stored. An empty
/// identity secret is accepted and yields a weak but deterministic key.
pub fn derive_key(identity_secret: &SecretString, salt: &str) -> DerivedKey {
    derive_key_with(identity_secret, salt, DEFAULT_PBKDF2_ITERATIONS)
}

/// Derive a key with an explicit PBKDF2 iteration count.
///
/// The count must match between derivations for the keys to agree; it is
/// part of the deployment configuration, not of the stored data.
pub fn derive_key_with(identity_secret: &SecretString, salt: &str, iterations: u32) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        identity_secret.expose_secret().as_bytes(),
        salt.as_bytes(),
        iterations,
        &mut key,
    );
    DerivedKey::from_bytes(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_deterministic() {
        let secret = SecretString::from("user@example.com:uid-1234");
        let key1 = derive_key(&secret, "salt");
        let key2 = derive_key(&secret, "salt");

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_secrets() {
        let key1 = derive_key(&SecretString::from("alice@example.com:1"), "salt");
        let key2 = derive_key(&SecretString::from("bob@example.com:2"), "salt");

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different identities must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let secret = SecretString::from("same@example.com:1");
        let key1 = derive_key(&secret, "salt-a");
        let key2 = derive_key(&secret, "salt-b");

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_iteration_count_changes_key() {
        let secret = SecretString::from("same@example.com:1");
        let key1 = derive_key_with(&secret, "salt", 10_000);
        let key2 = derive_key_with(&secret, "salt", 20_000);

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_empty_secret_is_permitted() {
        let key1 = derive_key(&SecretString::from(""), "salt");
        let key2 = derive_key(&SecretString::from(""), "salt");

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_known_answer() {
        // Independently computed with hashlib.pbkdf2_hmac('sha256',
        // b'user@example.com:uid-1234:pepper', b'pepper', 10000, 32).
        let key = derive_key(
            &SecretString::from("user@example.com:uid-1234:pepper"),
            "pepper",
        );
        assert_eq!(
            hex::encode(key.as_bytes()),
            "5432123023135fa0fd0db64dc1a8456198603fde7558e9249be2b0ba7fd77dbc"
        );
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = derive_key(&SecretString::from("secret"), "salt");
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&hex::encode(key.as_bytes())));
    }
}
