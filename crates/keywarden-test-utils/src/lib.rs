// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Keywarden: mock credential repositories.

pub mod repository;

pub use repository::{MemoryRepository, SlowRepository};
