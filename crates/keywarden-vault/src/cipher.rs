// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open over [`CiphertextEnvelope`] values.
//!
//! Every call to [`seal`] draws a fresh random 96-bit nonce from the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.
//!
//! Decryption failure is a single opaque error: a wrong key and tampered
//! ciphertext are indistinguishable to the caller, and neither plaintext
//! nor key material ever reaches an error message or a log line.

use keywarden_core::types::{CiphertextEnvelope, NONCE_LEN};
use keywarden_core::VaultError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::DerivedKey;

/// Encrypt a byte buffer under a fresh random nonce.
///
/// The returned envelope carries the nonce and the ciphertext with the
/// 16-byte authentication tag appended.
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<CiphertextEnvelope, VaultError> {
    let unbound =
        UnboundKey::new(&AES_256_GCM, key.as_bytes()).map_err(|_| VaultError::Encryption)?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes).map_err(|_| VaultError::Encryption)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: the buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::Encryption)?;

    Ok(CiphertextEnvelope {
        nonce: nonce_bytes,
        ciphertext: in_out,
    })
}

/// Decrypt an envelope, verifying the authentication tag.
pub fn open(key: &DerivedKey, envelope: &CiphertextEnvelope) -> Result<Vec<u8>, VaultError> {
    let unbound =
        UnboundKey::new(&AES_256_GCM, key.as_bytes()).map_err(|_| VaultError::Decryption)?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(envelope.nonce);

    let mut in_out = envelope.ciphertext.clone();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::Decryption)?;

    Ok(plaintext.to_vec())
}

/// Encrypt a credential field value.
pub fn encrypt(key: &DerivedKey, plaintext: &str) -> Result<CiphertextEnvelope, VaultError> {
    seal(key, plaintext.as_bytes())
}

/// Decrypt a credential field value.
///
/// Invalid UTF-8 after a successful open means the blob was written by
/// something else entirely; it maps to the same opaque error.
pub fn decrypt(key: &DerivedKey, envelope: &CiphertextEnvelope) -> Result<String, VaultError> {
    let plaintext = open(key, envelope)?;
    String::from_utf8(plaintext).map_err(|_| VaultError::Decryption)
}
