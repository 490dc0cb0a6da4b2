// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Keywarden vault engine.
//!
//! Layered TOML loading via Figment (defaults, system file, XDG file,
//! local file, `KEYWARDEN_*` environment variables) with semantic
//! validation and miette-rendered diagnostics.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::ConfigError;
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{KeywardenConfig, VaultConfig};
pub use validation::validate_config;
