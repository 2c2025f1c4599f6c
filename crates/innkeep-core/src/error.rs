// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Innkeep back office.

use thiserror::Error;

/// The primary error type used across the Innkeep adapter traits and the
/// mailbox ingestion pipeline.
///
/// The ingestion variants (`Connection`, `Search`, `Fetch`, `Parse`,
/// `Analysis`, `Persistence`) are contained within the pipeline: they are
/// logged and recovered locally, never propagated to API callers.
#[derive(Debug, Error)]
pub enum InnkeepError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Mailbox connection failure (unreachable server, dropped session).
    /// Recovered via reconnect with exponential backoff.
    #[error("mailbox connection error: {message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mailbox search query failed. Aborts the current fetch cycle.
    #[error("mailbox search error: {message}")]
    Search { message: String },

    /// A single message could not be retrieved. The message is skipped.
    #[error("fetch error for uid {uid}: {message}")]
    Fetch { uid: u32, message: String },

    /// Raw bytes were not valid MIME. The message is skipped.
    #[error("message parse error: {message}")]
    Parse { message: String },

    /// The classification service was unreachable or returned an error.
    /// Non-fatal: the ticket is written with defaulted classification.
    #[error("analysis error: {message}")]
    Analysis {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable store errors (connection, query failure, constraint violation).
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP gateway errors (bind failure, server error).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
