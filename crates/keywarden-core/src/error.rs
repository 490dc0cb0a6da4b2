// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keywarden vault engine.
//!
//! `Encryption` and `Decryption` carry no detail on purpose: the decryption
//! path must not distinguish a wrong key from tampered ciphertext, and
//! diagnostic context must never reach a display string or a log line.

use thiserror::Error;

/// The primary error type used across the Keywarden workspace.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Configuration errors (invalid TOML, out-of-range values, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Key derivation rejected its input (empty secret, iteration count below the floor).
    #[error("key derivation error: {0}")]
    KeyDerivation(String),

    /// The encryption primitive failed. Fatal, not retryable.
    #[error("encryption failed")]
    Encryption,

    /// Decryption failed. Opaque: wrong key and corrupted data are indistinguishable.
    #[error("could not decrypt")]
    Decryption,

    /// Invalid password generation policy (no character class selected, zero length).
    #[error("invalid generation policy: {0}")]
    Policy(String),

    /// Credential repository failure (fetch/store). Retryable at the caller's discretion.
    #[error("repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested field does not exist in the repository.
    #[error("field not found: {0}")]
    NotFound(String),

    /// A vault operation was attempted without an unlocked session.
    #[error("no active session")]
    NoActiveSession,

    /// A repository fetch exceeded its deadline. Distinct from decryption failure.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_error_message_is_generic() {
        // The display string must not hint at the failure cause.
        let msg = VaultError::Decryption.to_string();
        assert_eq!(msg, "could not decrypt");
        assert!(!msg.contains("key"));
        assert!(!msg.contains("tag"));
    }

    #[test]
    fn repository_error_carries_source() {
        let err = VaultError::Repository {
            message: "fetch failed".into(),
            source: Some(Box::new(std::io::Error::other("connection reset"))),
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn timeout_is_distinct_from_decryption() {
        let timeout = VaultError::Timeout {
            duration: std::time::Duration::from_millis(250),
        };
        assert!(matches!(timeout, VaultError::Timeout { .. }));
        assert!(!matches!(timeout, VaultError::Decryption));
    }
}
