// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailbox ingestion pipeline for the Innkeep back office.
//!
//! A timer-driven poller keeps one IMAP connection alive (reconnecting with
//! exponential backoff), discovers messages above the high-water mark,
//! decodes them, checks the dedup gate, classifies them via the analysis
//! service, and persists tickets. All failures are contained within the
//! pipeline and logged; nothing propagates to the hosting process or to API
//! callers.

pub mod connector;
pub mod cursor;
pub mod parser;
pub mod pipeline;
pub mod service;

pub use connector::{BackoffPolicy, ImapTransport, MailboxConnector, MailboxTransport, RawMessage};
pub use cursor::MailboxCursor;
pub use parser::{ParsedEmail, parse_message};
pub use pipeline::{CycleStats, IngestPipeline, MessageOutcome};
pub use service::{MailroomHandle, MailroomService};
