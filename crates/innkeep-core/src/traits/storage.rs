// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::InnkeepError;
use crate::types::{
    Booking, Contact, Guest, Hotel, NewBooking, NewContact, NewGuest, NewHotel, NewTicket,
    Ticket, TicketPatch,
};

/// Adapter for the durable store backing both the CRUD API and the
/// ingestion pipeline.
///
/// Each operation is its own independent transaction; no transaction spans
/// multiple pipeline stages. The dedup check and the subsequent insert are
/// therefore racy under concurrent ingestion, which the system rules out by
/// running a single ingestion process (single-writer assumption).
#[async_trait]
pub trait StorageAdapter: Send + Sync + 'static {
    /// Initializes the storage backend (opens connections, runs migrations).
    async fn initialize(&self) -> Result<(), InnkeepError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), InnkeepError>;

    // --- Ticket operations ---

    /// Inserts a new ticket and returns its assigned id.
    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<i64, InnkeepError>;

    /// Fetches a ticket by id.
    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, InnkeepError>;

    /// Lists all tickets, newest first.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, InnkeepError>;

    /// Finds a ticket by its message identifier (the dedup gate query).
    async fn find_ticket_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<Ticket>, InnkeepError>;

    /// Returns the highest mailbox sequence identifier among stored tickets,
    /// or 0 when no ingested ticket exists. Seeds the high-water mark at
    /// startup.
    async fn max_ticket_uid(&self) -> Result<u32, InnkeepError>;

    /// Applies a partial update; returns false when the ticket does not exist.
    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> Result<bool, InnkeepError>;

    // --- Hotel operations ---

    /// Paginated, searchable hotel listing. Returns the page and the total
    /// row count for the search.
    async fn list_hotels(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<Hotel>, i64), InnkeepError>;

    async fn get_hotel(&self, id: i64) -> Result<Option<Hotel>, InnkeepError>;

    async fn create_hotel(&self, hotel: &NewHotel) -> Result<i64, InnkeepError>;

    /// Replaces a hotel's fields; returns false when the hotel does not exist.
    async fn update_hotel(&self, id: i64, hotel: &NewHotel) -> Result<bool, InnkeepError>;

    // --- Contact operations ---

    async fn list_contacts(&self) -> Result<Vec<Contact>, InnkeepError>;

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, InnkeepError>;

    async fn create_contact(&self, contact: &NewContact) -> Result<i64, InnkeepError>;

    async fn update_contact(
        &self,
        id: i64,
        contact: &NewContact,
    ) -> Result<bool, InnkeepError>;

    async fn delete_contact(&self, id: i64) -> Result<bool, InnkeepError>;

    // --- Guest operations ---

    async fn list_guests(&self) -> Result<Vec<Guest>, InnkeepError>;

    async fn get_guest(&self, id: i64) -> Result<Option<Guest>, InnkeepError>;

    async fn create_guest(&self, guest: &NewGuest) -> Result<i64, InnkeepError>;

    async fn update_guest(&self, id: i64, guest: &NewGuest) -> Result<bool, InnkeepError>;

    async fn delete_guest(&self, id: i64) -> Result<bool, InnkeepError>;

    // --- Booking operations ---

    async fn list_bookings(&self) -> Result<Vec<Booking>, InnkeepError>;

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, InnkeepError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<i64, InnkeepError>;

    async fn update_booking(
        &self,
        id: i64,
        booking: &NewBooking,
    ) -> Result<bool, InnkeepError>;
}
