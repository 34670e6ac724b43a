// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Documents, signers, and the ports the workflow talks through.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Aggregates, value objects and repository/provider interfaces

pub mod document;
pub mod signer;
pub mod provider;
pub mod repository;
pub mod relay_config;
