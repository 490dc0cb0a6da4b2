// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master secret acquisition via TTY prompt or KEYWARDEN_MASTER_SECRET
//! environment variable.

use keywarden_core::VaultError;
use secrecy::SecretString;

/// The environment variable name for providing the master secret.
pub const MASTER_SECRET_ENV_VAR: &str = "KEYWARDEN_MASTER_SECRET";

/// Get the master secret from the environment or an interactive TTY prompt.
///
/// Priority:
/// 1. `KEYWARDEN_MASTER_SECRET` environment variable (for headless use)
/// 2. Interactive TTY prompt via `rpassword` (for human operators)
///
/// Returns an error if neither source is available.
pub fn get_master_secret() -> Result<SecretString, VaultError> {
    // Check env var first.
    if let Ok(secret) = std::env::var(MASTER_SECRET_ENV_VAR)
        && !secret.is_empty()
    {
        return Ok(SecretString::from(secret));
    }

    // Try interactive prompt.
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Master secret: ");
        let secret = rpassword::read_password()
            .map_err(|e| VaultError::Internal(format!("failed to read master secret: {e}")))?;
        if secret.is_empty() {
            return Err(VaultError::KeyDerivation(
                "master secret must not be empty".to_string(),
            ));
        }
        return Ok(SecretString::from(secret));
    }

    Err(VaultError::Internal(
        "No master secret provided. Set KEYWARDEN_MASTER_SECRET or run interactively.".to_string(),
    ))
}

/// Get the master secret with a confirmation prompt (for first-time setup).
///
/// Prompts twice and verifies the entries match. Only works in interactive
/// TTY mode; falls back to the env var if not a terminal.
pub fn get_master_secret_with_confirm() -> Result<SecretString, VaultError> {
    // Env var does not need confirmation.
    if let Ok(secret) = std::env::var(MASTER_SECRET_ENV_VAR)
        && !secret.is_empty()
    {
        return Ok(SecretString::from(secret));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("New master secret: ");
        let first = rpassword::read_password()
            .map_err(|e| VaultError::Internal(format!("failed to read master secret: {e}")))?;
        eprint!("Confirm master secret: ");
        let second = rpassword::read_password()
            .map_err(|e| VaultError::Internal(format!("failed to read master secret: {e}")))?;

        if first != second {
            return Err(VaultError::KeyDerivation(
                "master secrets do not match".to_string(),
            ));
        }
        if first.is_empty() {
            return Err(VaultError::KeyDerivation(
                "master secret must not be empty".to_string(),
            ));
        }
        return Ok(SecretString::from(first));
    }

    Err(VaultError::Internal(
        "No master secret provided. Set KEYWARDEN_MASTER_SECRET or run interactively.".to_string(),
    ))
}
