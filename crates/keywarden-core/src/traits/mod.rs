// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for external collaborators of the vault engine.

pub mod repository;

pub use repository::CredentialRepository;
