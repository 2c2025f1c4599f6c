// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Innkeep hotel-operations back office.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Innkeep workspace. The storage and
//! analysis crates implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::InnkeepError;
pub use types::{Analysis, BookingInfo, BookingStatus, Priority, TicketStatus};

// Re-export the adapter traits at crate root.
pub use traits::{MessageAnalyzer, StorageAdapter};
