// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock credential repositories for deterministic testing.
//!
//! `MemoryRepository` implements [`CredentialRepository`] over a HashMap,
//! counting fetches and access events, with a switch to make access
//! tracking fail. `SlowRepository` wraps any repository and injects
//! latency for timeout tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use keywarden_core::types::{CiphertextEnvelope, FieldRef};
use keywarden_core::{CredentialRepository, VaultError};

#[derive(Default)]
struct MemoryState {
    envelopes: HashMap<FieldRef, CiphertextEnvelope>,
    fetches: u64,
    accesses: HashMap<FieldRef, u64>,
    fail_access_tracking: bool,
}

/// An in-memory credential repository.
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Number of `get_encrypted_field` calls served so far.
    pub async fn fetch_count(&self) -> u64 {
        self.state.lock().await.fetches
    }

    /// Number of access events recorded for a field.
    pub async fn access_count(&self, field: &FieldRef) -> u64 {
        self.state
            .lock()
            .await
            .accesses
            .get(field)
            .copied()
            .unwrap_or(0)
    }

    /// Make subsequent `record_access` calls fail.
    pub async fn fail_access_tracking(&self, fail: bool) {
        self.state.lock().await.fail_access_tracking = fail;
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialRepository for MemoryRepository {
    async fn get_encrypted_field(&self, field: &FieldRef) -> Result<CiphertextEnvelope, VaultError> {
        let mut state = self.state.lock().await;
        state.fetches += 1;
        state
            .envelopes
            .get(field)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(field.to_string()))
    }

    async fn put_encrypted_field(
        &self,
        field: &FieldRef,
        envelope: CiphertextEnvelope,
    ) -> Result<(), VaultError> {
        self.state
            .lock()
            .await
            .envelopes
            .insert(field.clone(), envelope);
        Ok(())
    }

    async fn record_access(&self, field: &FieldRef) -> Result<(), VaultError> {
        let mut state = self.state.lock().await;
        if state.fail_access_tracking {
            return Err(VaultError::Repository {
                message: "access tracking unavailable".to_string(),
                source: None,
            });
        }
        *state.accesses.entry(field.clone()).or_insert(0) += 1;
        Ok(())
    }
}

/// Wraps a repository and delays every operation by a fixed latency.
pub struct SlowRepository {
    inner: Arc<dyn CredentialRepository>,
    latency: Duration,
}

impl SlowRepository {
    pub fn new(inner: Arc<dyn CredentialRepository>, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

#[async_trait]
impl CredentialRepository for SlowRepository {
    async fn get_encrypted_field(&self, field: &FieldRef) -> Result<CiphertextEnvelope, VaultError> {
        tokio::time::sleep(self.latency).await;
        self.inner.get_encrypted_field(field).await
    }

    async fn put_encrypted_field(
        &self,
        field: &FieldRef,
        envelope: CiphertextEnvelope,
    ) -> Result<(), VaultError> {
        tokio::time::sleep(self.latency).await;
        self.inner.put_encrypted_field(field, envelope).await
    }

    async fn record_access(&self, field: &FieldRef) -> Result<(), VaultError> {
        tokio::time::sleep(self.latency).await;
        self.inner.record_access(field).await
    }
}
