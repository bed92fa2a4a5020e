//! Per-field AES-256-CBC + HMAC-SHA256 encryption/decryption
//!
//! Envelope format (textual):
//! ```text
//! <hmac_hex>:<iv_hex>:<ciphertext_hex>
//! hmac_hex = HMAC-SHA256(key, iv_hex || ":" || ciphertext_hex)
//! ```
//!
//! The MAC covers the *textual* hex concatenation, colon included; that
//! detail must match bit-for-bit to interoperate with envelopes already at
//! rest. The MAC is verified before any AES decryption is attempted
//! (Encrypt-then-MAC, fail closed).

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use pvault_core::{VaultError, VaultResult};

use crate::kdf::DerivedKey;
use crate::{IV_SIZE, MAC_SIZE};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Encrypt a single field value.
///
/// Generates a fresh random 16-byte IV per call; the same plaintext never
/// produces the same envelope twice. An empty plaintext is the "field not
/// set" sentinel and encrypts to the empty string.
pub fn encrypt_field(plaintext: &str, key: &DerivedKey) -> String {
    if plaintext.is_empty() {
        return String::new();
    }

    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let body = format!("{}:{}", hex::encode(iv), hex::encode(&ciphertext));
    let mac = compute_mac(key, &body);
    format!("{}:{}", hex::encode(mac), body)
}

/// Decrypt a single field envelope.
///
/// Fails with `VaultError::Format` if the envelope is not a colon-delimited
/// triple, and with `VaultError::Integrity` on MAC mismatch, without
/// revealing which segment failed, and without ever running AES on
/// unauthenticated data.
pub fn decrypt_field(envelope: &str, key: &DerivedKey) -> VaultResult<String> {
    if envelope.is_empty() {
        return Ok(String::new());
    }

    let parts: Vec<&str> = envelope.split(':').collect();
    if parts.len() != 3 {
        return Err(VaultError::Format(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }
    let (mac_hex, iv_hex, ct_hex) = (parts[0], parts[1], parts[2]);

    let body = format!("{iv_hex}:{ct_hex}");
    let expected = compute_mac(key, &body);
    let stored = hex::decode(mac_hex).map_err(|_| VaultError::Integrity)?;
    if !bool::from(stored[..].ct_eq(&expected[..])) {
        return Err(VaultError::Integrity);
    }

    // The MAC is computed over the textual segments, so after verification
    // they are exactly what encrypt_field emitted under this key. Any
    // failure past this point is a cipher bug, not attacker input.
    let iv: [u8; IV_SIZE] = hex::decode(iv_hex)
        .expect("authenticated IV segment is not hex")
        .try_into()
        .expect("authenticated IV segment has wrong length");
    let ciphertext = hex::decode(ct_hex).expect("authenticated ciphertext segment is not hex");

    let plaintext = Aes256CbcDec::new(key.as_bytes().into(), (&iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .expect("authenticated ciphertext failed to unpad");

    Ok(String::from_utf8(plaintext).expect("authenticated plaintext is not UTF-8"))
}

fn compute_mac(key: &DerivedKey, body: &str) -> [u8; MAC_SIZE] {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC-SHA256 accepts any key length");
    mac.update(body.as_bytes());
    mac.finalize().into_bytes().into()
}
