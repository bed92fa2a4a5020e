//! pvault-crypto: client-side encryption for PocketVault
//!
//! Architecture: Encrypt-then-MAC per field
//!
//! Pipeline: plaintext field → AES-256-CBC (fresh random IV) → HMAC-SHA256
//! over the textual `iv_hex:ciphertext_hex` → colon-delimited envelope
//!
//! ```text
//! Derived Key (256-bit, PBKDF2-SHA256 from identity secret + salt)
//!   ├── AES-256-CBC cipher key (PKCS#7 padding, 16-byte random IV per call)
//!   └── HMAC-SHA256 MAC key (same key, Encrypt-then-MAC)
//! ```
//!
//! The envelope wire format is `<hmac_hex>:<iv_hex>:<ciphertext_hex>` and is
//! bit-for-bit compatible with data written by earlier clients.

pub mod cipher;
pub mod codec;
pub mod kdf;
pub mod passgen;
pub mod session;

pub use cipher::{decrypt_field, encrypt_field};
pub use codec::{open_fields, seal_fields, OpenedRecord, DECRYPT_FAILED_SENTINEL};
pub use kdf::{derive_key, derive_key_with, DerivedKey};
pub use passgen::{generate_passphrase, generate_password, PasswordOptions};
pub use session::Session;

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-CBC initialization vector
pub const IV_SIZE: usize = 16;

/// Size of an HMAC-SHA256 tag
pub const MAC_SIZE: usize = 32;

/// Default PBKDF2-SHA256 iteration count
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 10_000;
