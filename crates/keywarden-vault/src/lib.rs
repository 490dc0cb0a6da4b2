// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault cryptography and credential-generation engine for Keywarden.
//!
//! The engine derives a session key from the master secret (PBKDF2-HMAC-
//! SHA256), encrypts and decrypts individual credential fields with
//! AES-256-GCM, generates passwords under character-class policies with
//! bias-free sampling, scores password strength, and mediates transient
//! decrypt-on-demand reveals against an external credential repository.
//!
//! Plaintext exists only inside [`access::RevealedField`] values and is
//! zeroized on drop; the session key lives in [`session::SessionContext`]
//! and is cleared on lock.

pub mod access;
pub mod cipher;
pub mod generator;
pub mod kdf;
pub mod prompt;
pub mod session;
pub mod strength;

pub use access::{mask_secret, AccessController, RevealPhase, RevealedField};
pub use generator::generate;
pub use kdf::{derive, generate_salt, DerivedKey, KEY_LEN, SALT_LEN};
pub use prompt::{get_master_secret, get_master_secret_with_confirm};
pub use session::SessionContext;
pub use strength::{score, validate, MAX_SCORE};
