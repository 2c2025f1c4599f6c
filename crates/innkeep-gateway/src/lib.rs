// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP REST gateway for the Innkeep back office.
//!
//! Thin pass-through CRUD over the storage adapter plus the on-demand
//! mailbox trigger. The gateway shares the durable store with the ingestion
//! pipeline but never observes pipeline state directly: the check-imap
//! endpoint only signals the poller's task loop.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, GatewayConfig, router, start_server};
