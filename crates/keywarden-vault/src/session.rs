// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped key lifecycle: unlock, read, lock.
//!
//! The active key is write-once per session: it is installed on a
//! successful unlock, shared read-only by any number of concurrent
//! reveals, and cleared (zeroized) on lock. Re-unlocking requires an
//! explicit `lock()` first; there is no silent key replacement.
//!
//! The wrapping variants keep a random master key under a
//! passphrase-derived wrapping key, so a passphrase change re-wraps one
//! 32-byte blob instead of re-encrypting every stored field.

use std::sync::{Arc, RwLock};

use keywarden_core::types::CiphertextEnvelope;
use keywarden_core::VaultError;
use secrecy::SecretString;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cipher;
use crate::kdf::{self, DerivedKey, KEY_LEN, SALT_LEN};

/// Holder of the session's derived key.
///
/// Debug output intentionally omits the key for security.
pub struct SessionContext {
    key: RwLock<Option<Arc<DerivedKey>>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create a locked session with no key.
    pub fn new() -> Self {
        Self {
            key: RwLock::new(None),
        }
    }

    /// Unlock by deriving the key directly from the master secret.
    ///
    /// The secret is consumed and dropped once derivation completes.
    pub async fn unlock(
        &self,
        secret: SecretString,
        salt: [u8; SALT_LEN],
        iterations: u32,
    ) -> Result<(), VaultError> {
        let key = derive_blocking(secret, salt, iterations).await?;
        self.install(key)?;
        info!("session unlocked");
        Ok(())
    }

    /// First-time unlock with key wrapping: generates a random master key,
    /// installs it, and returns the master key wrapped under the
    /// passphrase-derived key for the caller to persist.
    pub async fn unlock_new(
        &self,
        secret: SecretString,
        salt: [u8; SALT_LEN],
        iterations: u32,
    ) -> Result<CiphertextEnvelope, VaultError> {
        let wrapping_key = derive_blocking(secret, salt, iterations).await?;
        let master_key = DerivedKey::generate()?;
        let wrapped = cipher::seal(&wrapping_key, master_key.as_bytes())?;
        self.install(master_key)?;
        info!("session unlocked with new master key");
        Ok(wrapped)
    }

    /// Unlock an existing wrapped master key.
    ///
    /// A wrong passphrase surfaces as the opaque decryption error, exactly
    /// like tampered ciphertext.
    pub async fn unlock_wrapped(
        &self,
        secret: SecretString,
        salt: [u8; SALT_LEN],
        iterations: u32,
        wrapped: &CiphertextEnvelope,
    ) -> Result<(), VaultError> {
        let wrapping_key = derive_blocking(secret, salt, iterations).await?;
        let master_bytes = Zeroizing::new(cipher::open(&wrapping_key, wrapped)?);
        let master: [u8; KEY_LEN] = master_bytes
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::Decryption)?;
        self.install(DerivedKey::from_bytes(master))?;
        debug!("session unlocked from wrapped master key");
        Ok(())
    }

    /// Re-wrap the active master key under a new passphrase.
    ///
    /// Stored fields are NOT re-encrypted; only the returned wrapper blob
    /// changes. The caller persists it together with the new salt.
    pub async fn rewrap(
        &self,
        new_secret: SecretString,
        new_salt: [u8; SALT_LEN],
        iterations: u32,
    ) -> Result<CiphertextEnvelope, VaultError> {
        let master_key = self.active_key()?;
        let wrapping_key = derive_blocking(new_secret, new_salt, iterations).await?;
        let wrapped = cipher::seal(&wrapping_key, master_key.as_bytes())?;
        info!("master key re-wrapped under new passphrase");
        Ok(wrapped)
    }

    /// Clear the key. Dropping the last reference zeroizes it.
    pub fn lock(&self) {
        if let Ok(mut guard) = self.key.write() {
            *guard = None;
        }
        info!("session locked");
    }

    /// The active key, shared read-only.
    ///
    /// Fails with [`VaultError::NoActiveSession`] while locked.
    pub fn active_key(&self) -> Result<Arc<DerivedKey>, VaultError> {
        self.key
            .read()
            .map_err(|_| VaultError::Internal("session lock poisoned".to_string()))?
            .clone()
            .ok_or(VaultError::NoActiveSession)
    }

    pub fn is_unlocked(&self) -> bool {
        self.key.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    fn install(&self, key: DerivedKey) -> Result<(), VaultError> {
        let mut guard = self
            .key
            .write()
            .map_err(|_| VaultError::Internal("session lock poisoned".to_string()))?;
        if guard.is_some() {
            return Err(VaultError::Internal(
                "session is already unlocked; lock() it before unlocking again".to_string(),
            ));
        }
        *guard = Some(Arc::new(key));
        Ok(())
    }
}

/// Run the CPU-bound derivation off the async executor.
async fn derive_blocking(
    secret: SecretString,
    salt: [u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKey, VaultError> {
    tokio::task::spawn_blocking(move || kdf::derive(&secret, &salt, iterations))
        .await
        .map_err(|e| VaultError::Internal(format!("key derivation task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use keywarden_core::types::MIN_KDF_ITERATIONS;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn new_session_is_locked() {
        let session = SessionContext::new();
        assert!(!session.is_unlocked());
        assert!(matches!(
            session.active_key(),
            Err(VaultError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn unlock_then_lock_lifecycle() {
        let session = SessionContext::new();
        session
            .unlock(secret("master"), [1u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await
            .unwrap();
        assert!(session.is_unlocked());
        assert!(session.active_key().is_ok());

        session.lock();
        assert!(!session.is_unlocked());
        assert!(matches!(
            session.active_key(),
            Err(VaultError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn double_unlock_is_rejected() {
        let session = SessionContext::new();
        session
            .unlock(secret("master"), [1u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await
            .unwrap();
        let result = session
            .unlock(secret("other"), [1u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await;
        assert!(matches!(result, Err(VaultError::Internal(_))));
    }

    #[tokio::test]
    async fn empty_secret_does_not_unlock() {
        let session = SessionContext::new();
        let result = session
            .unlock(secret(""), [1u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await;
        assert!(matches!(result, Err(VaultError::KeyDerivation(_))));
        assert!(!session.is_unlocked());
    }

    #[tokio::test]
    async fn concurrent_readers_share_the_key() {
        let session = Arc::new(SessionContext::new());
        session
            .unlock(secret("master"), [1u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let session = Arc::clone(&session);
            handles.push(tokio::spawn(async move { session.active_key().is_ok() }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }

    #[tokio::test]
    async fn wrapped_unlock_restores_the_same_master_key() {
        let salt = [4u8; SALT_LEN];
        let session = SessionContext::new();
        let wrapped = session
            .unlock_new(secret("passphrase"), salt, MIN_KDF_ITERATIONS)
            .await
            .unwrap();

        // Something encrypted under the fresh master key...
        let envelope = cipher::encrypt(&session.active_key().unwrap(), "field value").unwrap();

        session.lock();
        session
            .unlock_wrapped(secret("passphrase"), salt, MIN_KDF_ITERATIONS, &wrapped)
            .await
            .unwrap();

        // ...is still readable after a relock cycle.
        let decrypted = cipher::decrypt(&session.active_key().unwrap(), &envelope).unwrap();
        assert_eq!(decrypted, "field value");
    }

    #[tokio::test]
    async fn wrong_passphrase_fails_opaquely() {
        let salt = [5u8; SALT_LEN];
        let session = SessionContext::new();
        let wrapped = session
            .unlock_new(secret("correct"), salt, MIN_KDF_ITERATIONS)
            .await
            .unwrap();
        session.lock();

        let result = session
            .unlock_wrapped(secret("wrong"), salt, MIN_KDF_ITERATIONS, &wrapped)
            .await;
        assert!(matches!(result, Err(VaultError::Decryption)));
        assert!(!session.is_unlocked());
    }

    #[tokio::test]
    async fn rewrap_preserves_stored_fields() {
        let old_salt = [6u8; SALT_LEN];
        let new_salt = [7u8; SALT_LEN];
        let session = SessionContext::new();
        let old_wrapped = session
            .unlock_new(secret("old pass"), old_salt, MIN_KDF_ITERATIONS)
            .await
            .unwrap();
        let envelope = cipher::encrypt(&session.active_key().unwrap(), "survives rotation").unwrap();

        let new_wrapped = session
            .rewrap(secret("new pass"), new_salt, MIN_KDF_ITERATIONS)
            .await
            .unwrap();
        assert_ne!(old_wrapped, new_wrapped);
        session.lock();

        // Old passphrase no longer opens the new wrapper.
        let stale = session
            .unlock_wrapped(secret("old pass"), new_salt, MIN_KDF_ITERATIONS, &new_wrapped)
            .await;
        assert!(matches!(stale, Err(VaultError::Decryption)));

        session
            .unlock_wrapped(secret("new pass"), new_salt, MIN_KDF_ITERATIONS, &new_wrapped)
            .await
            .unwrap();
        let decrypted = cipher::decrypt(&session.active_key().unwrap(), &envelope).unwrap();
        assert_eq!(decrypted, "survives rotation");
    }

    #[tokio::test]
    async fn rewrap_requires_an_unlocked_session() {
        let session = SessionContext::new();
        let result = session
            .rewrap(secret("new pass"), [0u8; SALT_LEN], MIN_KDF_ITERATIONS)
            .await;
        assert!(matches!(result, Err(VaultError::NoActiveSession)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let session = SessionContext::new();
        assert!(format!("{session:?}").contains("REDACTED"));
    }
}
