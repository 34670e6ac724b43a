// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`esign-relay-core`)
//!
//! HTTP surface that translates external requests into application calls.
//! Validation and provider orchestration live in `crate::application`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Axum router, request DTOs and handlers |
//! | [`upload`] | Streams multipart uploads into scoped temporary files |
//! | [`error`] | `WorkflowError` → HTTP status and `{ "error": ... }` body |

pub mod api;
pub mod error;
pub mod upload;

pub use api::{app, AppState};
pub use error::ApiError;
