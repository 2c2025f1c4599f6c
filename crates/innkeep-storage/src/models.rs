// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `innkeep-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use innkeep_core::types::{
    Booking, Contact, Guest, Hotel, NewBooking, NewContact, NewGuest, NewHotel, NewTicket,
    Ticket, TicketPatch,
};
