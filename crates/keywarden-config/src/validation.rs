// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as the KDF iteration floor and the generation policy
//! invariant that at least one character class is enabled.

use keywarden_core::types::MIN_KDF_ITERATIONS;

use crate::diagnostic::ConfigError;
use crate::model::KeywardenConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeywardenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.fetch_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "vault.fetch_timeout_ms must be at least 1".to_string(),
        });
    }

    if config.generator.length == 0 {
        errors.push(ConfigError::Validation {
            message: "generator.length must be at least 1".to_string(),
        });
    }

    let policy = &config.generator;
    if !(policy.include_uppercase
        || policy.include_lowercase
        || policy.include_digits
        || policy.include_symbols)
    {
        errors.push(ConfigError::Validation {
            message: "generator must enable at least one character class".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
