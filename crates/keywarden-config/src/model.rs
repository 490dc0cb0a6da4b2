// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Keywarden vault engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use keywarden_core::GenerationPolicy;
use serde::{Deserialize, Serialize};

/// Top-level Keywarden configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardenConfig {
    /// Key derivation and access-controller settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Default password generation policy.
    #[serde(default)]
    pub generator: GenerationPolicy,
}

/// Key derivation and access-controller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count for new key derivations
    /// (default: 600000, OWASP recommendation; floor: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Deadline for a single repository fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    600_000
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

impl VaultConfig {
    /// The repository fetch deadline as a [`std::time::Duration`].
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.fetch_timeout_ms)
    }
}
