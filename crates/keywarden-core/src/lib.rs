// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keywarden password vault engine.
//!
//! This crate provides the error taxonomy, the shared data model
//! (field references, ciphertext envelopes, generation policies), and
//! the trait boundary to the persistence collaborator. It contains no
//! cryptography and performs no I/O.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use traits::CredentialRepository;
pub use types::{
    CiphertextEnvelope, CredentialId, FieldKind, FieldRef, GenerationPolicy, StrengthReport,
    ENVELOPE_VERSION, MIN_KDF_ITERATIONS, NONCE_LEN, TAG_LEN,
};
