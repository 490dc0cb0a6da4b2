// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error type with miette diagnostics.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error suitable for terminal diagnostic rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to load or deserialize the configuration sources.
    #[error("failed to load configuration: {0}")]
    #[diagnostic(
        code(keywarden::config::load),
        help("check keywarden.toml syntax and KEYWARDEN_* environment variables")
    )]
    Load(#[from] figment::Error),

    /// A semantic validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(keywarden::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}
