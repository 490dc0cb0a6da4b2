// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decrypt-on-demand access control.
//!
//! Every reveal re-fetches and re-decrypts; no plaintext is cached between
//! reveals and no state survives a reveal. The fetch runs under a deadline
//! and the whole fetch+decrypt runs on its own task, so a caller that
//! abandons a reveal mid-flight leaves the operation to complete and its
//! result to be dropped unobserved.

use std::sync::Arc;
use std::time::Duration;

use keywarden_config::VaultConfig;
use keywarden_core::types::FieldRef;
use keywarden_core::{CredentialRepository, VaultError};
use secrecy::SecretString;
use tracing::debug;

use crate::cipher;
use crate::session::SessionContext;

/// Reveal flow phases, traced for observability.
///
/// `Idle -> Fetching -> Decrypting -> Revealed -> Idle` on success, or
/// `-> Failed -> Idle` on fetch/decrypt error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Fetching,
    Decrypting,
    Revealed,
    Failed,
}

impl std::fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Decrypting => "decrypting",
            Self::Revealed => "revealed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A transiently revealed field value.
///
/// The caller is expected to drop this as soon as the value has been used
/// (modal closed, clipboard copy done); dropping zeroizes the plaintext.
pub struct RevealedField {
    field: FieldRef,
    value: SecretString,
}

impl RevealedField {
    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// The decrypted value. Use [`secrecy::ExposeSecret`] at the last
    /// possible moment and do not copy it into longer-lived state.
    pub fn secret(&self) -> &SecretString {
        &self.value
    }
}

impl std::fmt::Debug for RevealedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealedField")
            .field("field", &self.field)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Mediates reveal and save operations between the session key and the
/// credential repository.
pub struct AccessController {
    repository: Arc<dyn CredentialRepository>,
    session: Arc<SessionContext>,
    fetch_timeout: Duration,
}

impl AccessController {
    pub fn new(
        repository: Arc<dyn CredentialRepository>,
        session: Arc<SessionContext>,
        config: &VaultConfig,
    ) -> Self {
        Self {
            repository,
            session,
            fetch_timeout: config.fetch_timeout(),
        }
    }

    /// Reveal a field using the configured fetch deadline.
    pub async fn reveal(&self, field: &FieldRef) -> Result<RevealedField, VaultError> {
        self.reveal_with_timeout(field, self.fetch_timeout).await
    }

    /// Reveal a field, bounding the repository fetch by `timeout`.
    ///
    /// A deadline miss maps to [`VaultError::Timeout`], never to the
    /// decryption error. The access-tracking event is fire-and-forget: its
    /// failure is logged at debug level and cannot fail the reveal.
    pub async fn reveal_with_timeout(
        &self,
        field: &FieldRef,
        timeout: Duration,
    ) -> Result<RevealedField, VaultError> {
        let key = self.session.active_key()?;
        let repository = Arc::clone(&self.repository);
        let task_field = field.clone();
        debug!(field = %field, phase = %RevealPhase::Fetching, "reveal started");

        let handle = tokio::spawn(async move {
            let envelope = match tokio::time::timeout(
                timeout,
                repository.get_encrypted_field(&task_field),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => return Err(VaultError::Timeout { duration: timeout }),
            };
            debug!(field = %task_field, phase = %RevealPhase::Decrypting, "envelope fetched");
            let plaintext = cipher::decrypt(&key, &envelope)?;
            Ok(SecretString::from(plaintext))
        });

        let result = handle
            .await
            .map_err(|e| VaultError::Internal(format!("reveal task failed: {e}")))?;

        match result {
            Ok(value) => {
                debug!(field = %field, phase = %RevealPhase::Revealed, "field revealed");
                self.spawn_record_access(field);
                Ok(RevealedField {
                    field: field.clone(),
                    value,
                })
            }
            Err(err) => {
                debug!(field = %field, phase = %RevealPhase::Failed, "reveal failed");
                Err(err)
            }
        }
    }

    /// Encrypt and persist a field value.
    ///
    /// Every save draws a fresh nonce, so edits never reuse one.
    pub async fn save(&self, field: &FieldRef, plaintext: &str) -> Result<(), VaultError> {
        let key = self.session.active_key()?;
        let envelope = cipher::encrypt(&key, plaintext)?;
        self.repository.put_encrypted_field(field, envelope).await?;
        debug!(field = %field, "field saved");
        Ok(())
    }

    fn spawn_record_access(&self, field: &FieldRef) {
        let repository = Arc::clone(&self.repository);
        let field = field.clone();
        tokio::spawn(async move {
            if let Err(err) = repository.record_access(&field).await {
                debug!(field = %field, error = %err, "access tracking failed");
            }
        });
    }
}

/// Mask a secret value for list display: `"abcd...wxyz"`.
///
/// Shows up to four leading and trailing characters; short values are
/// fully masked so nothing useful leaks from previews.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
