// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master secret.
//!
//! Derivation is deterministic for a fixed (secret, salt, iterations)
//! triple -- the user must be able to re-derive the same key after
//! re-login to read existing ciphertext. The iteration floor is enforced
//! here, not just in config validation.

use std::num::NonZeroU32;

use keywarden_core::types::MIN_KDF_ITERATIONS;
use keywarden_core::VaultError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Symmetric key length in bytes (256 bits, AES-256-GCM).
pub const KEY_LEN: usize = 32;

/// Per-account salt length in bytes.
pub const SALT_LEN: usize = 16;

/// A 256-bit symmetric key held in zeroizing memory.
///
/// Debug output intentionally omits the key bytes.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DerivedKey").field(&"[REDACTED]").finish()
    }
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Draw a random 256-bit key from the system CSPRNG.
    ///
    /// Used as the master key in the wrapping scheme; field keys always
    /// come from [`derive`].
    pub fn generate() -> Result<Self, VaultError> {
        let rng = SystemRandom::new();
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        rng.fill(key.as_mut())
            .map_err(|_| VaultError::Internal("failed to generate random key".to_string()))?;
        Ok(Self(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derive a 256-bit key from the master secret using PBKDF2-HMAC-SHA256.
///
/// Fails with [`VaultError::KeyDerivation`] on an empty secret or an
/// iteration count below [`MIN_KDF_ITERATIONS`].
pub fn derive(
    secret: &SecretString,
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKey, VaultError> {
    if secret.expose_secret().is_empty() {
        return Err(VaultError::KeyDerivation(
            "master secret must not be empty".to_string(),
        ));
    }
    if iterations < MIN_KDF_ITERATIONS {
        return Err(VaultError::KeyDerivation(format!(
            "iteration count {iterations} is below the minimum {MIN_KDF_ITERATIONS}"
        )));
    }
    let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
        VaultError::KeyDerivation("iteration count must be non-zero".to_string())
    })?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        secret.expose_secret().as_bytes(),
        output.as_mut(),
    );

    Ok(DerivedKey(output))
}

/// Generate a random 16-byte per-account salt.
///
/// Not secret, but must be unique per account and fixed once chosen.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
