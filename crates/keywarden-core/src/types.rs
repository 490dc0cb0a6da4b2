// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the vault engine and its collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::VaultError;

/// Unique identifier for a stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub String);

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The semantic meaning of one encrypted field of a credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum FieldKind {
    Password,
    Username,
    Url,
    Notes,
    OtpUrl,
}

/// Names one encrypted field of one credential, e.g. the password of `github`.
///
/// Field references are not secret and may appear in logs and audit events;
/// the field's value never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub credential: CredentialId,
    pub kind: FieldKind,
}

impl FieldRef {
    pub fn new(credential: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            credential: CredentialId(credential.into()),
            kind,
        }
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.credential, self.kind)
    }
}

/// Minimum accepted PBKDF2 iteration count. Derivation and configuration
/// validation both enforce this floor.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Envelope wire format version. Bumped on any algorithm or layout change.
pub const ENVELOPE_VERSION: u8 = 1;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// A self-contained AEAD ciphertext: random nonce plus ciphertext with the
/// authentication tag appended.
///
/// Serialized as `version || nonce || ciphertext+tag` so future algorithm
/// changes can be told apart from v1 blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextEnvelope {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl CiphertextEnvelope {
    /// Serialize to the versioned wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + NONCE_LEN + self.ciphertext.len());
        out.push(ENVELOPE_VERSION);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse the versioned wire layout.
    ///
    /// Malformed input (truncated, unknown version) maps to the same opaque
    /// error as an authentication failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        if bytes.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(VaultError::Decryption);
        }
        if bytes[0] != ENVELOPE_VERSION {
            return Err(VaultError::Decryption);
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[1..1 + NONCE_LEN]);
        Ok(Self {
            nonce,
            ciphertext: bytes[1 + NONCE_LEN..].to_vec(),
        })
    }
}

/// Character-class constraints for password generation.
///
/// Doubles as the `[generator]` configuration section; defaults produce a
/// 16-character password drawing on all four classes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationPolicy {
    /// Number of characters to generate.
    #[serde(default = "default_length")]
    pub length: usize,

    #[serde(default = "default_include")]
    pub include_uppercase: bool,

    #[serde(default = "default_include")]
    pub include_lowercase: bool,

    #[serde(default = "default_include")]
    pub include_digits: bool,

    #[serde(default = "default_include")]
    pub include_symbols: bool,

    /// Drop visually confusable characters (`0 O 1 l I`) from the alphabet.
    #[serde(default)]
    pub exclude_ambiguous: bool,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            length: default_length(),
            include_uppercase: default_include(),
            include_lowercase: default_include(),
            include_digits: default_include(),
            include_symbols: default_include(),
            exclude_ambiguous: false,
        }
    }
}

fn default_length() -> usize {
    16
}

fn default_include() -> bool {
    true
}

/// Result of strength validation: a heuristic score plus one remediation
/// suggestion per deficiency found, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    pub score: u8,
    pub is_valid: bool,
    pub suggestions: Vec<String>,
}
