// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod opensign;
pub mod repositories;

pub use opensign::OpenSignClient;
pub use repositories::InMemoryDocumentRegistry;
