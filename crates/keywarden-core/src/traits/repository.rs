// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential repository trait for the persistence collaborator.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::types::{CiphertextEnvelope, FieldRef};

/// Storage collaborator holding opaque encrypted blobs keyed by field.
///
/// The repository never sees plaintext or key material: it stores and
/// returns [`CiphertextEnvelope`] values as-is. Implementations live
/// outside this workspace (REST client, local database, ...); tests use
/// the in-memory mock from `keywarden-test-utils`.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Fetch the stored envelope for a field.
    ///
    /// Fails with [`VaultError::NotFound`] when the field does not exist,
    /// or [`VaultError::Repository`] on backend failure.
    async fn get_encrypted_field(&self, field: &FieldRef) -> Result<CiphertextEnvelope, VaultError>;

    /// Persist an envelope on create or update.
    async fn put_encrypted_field(
        &self,
        field: &FieldRef,
        envelope: CiphertextEnvelope,
    ) -> Result<(), VaultError>;

    /// Best-effort audit signal that a field was revealed.
    ///
    /// Not part of the crypto contract; callers fire it detached and
    /// ignore failures.
    async fn record_access(&self, field: &FieldRef) -> Result<(), VaultError>;
}
