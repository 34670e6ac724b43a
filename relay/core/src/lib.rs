// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! eSign Relay Core
//!
//! Document-signing workflow for the OpenSign Labs relay: upload a PDF as a
//! draft template, submit it for ordered signing, then attach the third
//! signer once the second has signed.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, workflow services, provider adapter and HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
