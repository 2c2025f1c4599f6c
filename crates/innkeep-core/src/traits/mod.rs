// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Innkeep back office.
//!
//! Traits sit at the seams between the ingestion pipeline, the HTTP
//! gateway, and their backing services. All use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod analyzer;
pub mod storage;

pub use analyzer::MessageAnalyzer;
pub use storage::StorageAdapter;
