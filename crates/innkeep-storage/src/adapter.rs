// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use innkeep_config::model::StorageConfig;
use innkeep_core::types::{
    Booking, Contact, Guest, Hotel, NewBooking, NewContact, NewGuest, NewHotel, NewTicket,
    Ticket, TicketPatch,
};
use innkeep_core::{InnkeepError, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, InnkeepError> {
        self.db.get().ok_or_else(|| InnkeepError::Persistence {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), InnkeepError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| InnkeepError::Persistence {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), InnkeepError> {
        self.db()?.close().await
    }

    // --- Ticket operations ---

    async fn insert_ticket(&self, ticket: &NewTicket) -> Result<i64, InnkeepError> {
        queries::tickets::insert_ticket(self.db()?, ticket).await
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, InnkeepError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, InnkeepError> {
        queries::tickets::list_tickets(self.db()?).await
    }

    async fn find_ticket_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<Ticket>, InnkeepError> {
        queries::tickets::find_by_message_id(self.db()?, message_id).await
    }

    async fn max_ticket_uid(&self) -> Result<u32, InnkeepError> {
        queries::tickets::max_uid(self.db()?).await
    }

    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> Result<bool, InnkeepError> {
        queries::tickets::update_ticket(self.db()?, id, patch).await
    }

    // --- Hotel operations ---

    async fn list_hotels(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<Hotel>, i64), InnkeepError> {
        queries::hotels::list_hotels(self.db()?, page, limit, search).await
    }

    async fn get_hotel(&self, id: i64) -> Result<Option<Hotel>, InnkeepError> {
        queries::hotels::get_hotel(self.db()?, id).await
    }

    async fn create_hotel(&self, hotel: &NewHotel) -> Result<i64, InnkeepError> {
        queries::hotels::create_hotel(self.db()?, hotel).await
    }

    async fn update_hotel(&self, id: i64, hotel: &NewHotel) -> Result<bool, InnkeepError> {
        queries::hotels::update_hotel(self.db()?, id, hotel).await
    }

    // --- Contact operations ---

    async fn list_contacts(&self) -> Result<Vec<Contact>, InnkeepError> {
        queries::contacts::list_contacts(self.db()?).await
    }

    async fn get_contact(&self, id: i64) -> Result<Option<Contact>, InnkeepError> {
        queries::contacts::get_contact(self.db()?, id).await
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<i64, InnkeepError> {
        queries::contacts::create_contact(self.db()?, contact).await
    }

    async fn update_contact(
        &self,
        id: i64,
        contact: &NewContact,
    ) -> Result<bool, InnkeepError> {
        queries::contacts::update_contact(self.db()?, id, contact).await
    }

    async fn delete_contact(&self, id: i64) -> Result<bool, InnkeepError> {
        queries::contacts::delete_contact(self.db()?, id).await
    }

    // --- Guest operations ---

    async fn list_guests(&self) -> Result<Vec<Guest>, InnkeepError> {
        queries::guests::list_guests(self.db()?).await
    }

    async fn get_guest(&self, id: i64) -> Result<Option<Guest>, InnkeepError> {
        queries::guests::get_guest(self.db()?, id).await
    }

    async fn create_guest(&self, guest: &NewGuest) -> Result<i64, InnkeepError> {
        queries::guests::create_guest(self.db()?, guest).await
    }

    async fn update_guest(&self, id: i64, guest: &NewGuest) -> Result<bool, InnkeepError> {
        queries::guests::update_guest(self.db()?, id, guest).await
    }

    async fn delete_guest(&self, id: i64) -> Result<bool, InnkeepError> {
        queries::guests::delete_guest(self.db()?, id).await
    }

    // --- Booking operations ---

    async fn list_bookings(&self) -> Result<Vec<Booking>, InnkeepError> {
        queries::bookings::list_bookings(self.db()?).await
    }

    async fn get_booking(&self, id: i64) -> Result<Option<Booking>, InnkeepError> {
        queries::bookings::get_booking(self.db()?, id).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<i64, InnkeepError> {
        queries::bookings::create_booking(self.db()?, booking).await
    }

    async fn update_booking(
        &self,
        id: i64,
        booking: &NewBooking,
    ) -> Result<bool, InnkeepError> {
        queries::bookings::update_booking(self.db()?, id, booking).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn make_ticket(message_id: &str, uid: u32) -> NewTicket {
        NewTicket {
            message_id: message_id.to_string(),
            uid,
            subject: "Booking confirmation".to_string(),
            body: "Arriving Friday".to_string(),
            html_body: None,
            from_email: "guest@example.com".to_string(),
            category: "booking_request".to_string(),
            priority: "medium".to_string(),
            sentiment: 0.7,
            extracted_info: "{}".to_string(),
            processed: true,
            status: "open".to_string(),
            hotel_id: None,
            contact_id: None,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.list_tickets().await.is_err());
        assert!(storage.max_ticket_uid().await.is_err());
    }

    #[tokio::test]
    async fn full_ticket_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let id = storage
            .insert_ticket(&make_ticket("<adapter@example.com>", 11))
            .await
            .unwrap();

        let found = storage
            .find_ticket_by_message_id("<adapter@example.com>")
            .await
            .unwrap();
        assert_eq!(found.map(|t| t.id), Some(id));

        assert_eq!(storage.max_ticket_uid().await.unwrap(), 11);

        let patch = TicketPatch {
            status: Some("in_progress".to_string()),
            ..TicketPatch::default()
        };
        assert!(storage.update_ticket(id, &patch).await.unwrap());
        let ticket = storage.get_ticket(id).await.unwrap().unwrap();
        assert_eq!(ticket.status, "in_progress");

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn crud_entities_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("crud.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let hotel_id = storage
            .create_hotel(&NewHotel {
                name: "Acacia Lodge".to_string(),
                ..NewHotel::default()
            })
            .await
            .unwrap();
        let (hotels, total) = storage.list_hotels(1, 10, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(hotels[0].id, hotel_id);

        let contact_id = storage
            .create_contact(&NewContact {
                first_name: "Amina".to_string(),
                last_name: "Odhiambo".to_string(),
                email: "amina@example.com".to_string(),
                ..NewContact::default()
            })
            .await
            .unwrap();
        assert!(storage.get_contact(contact_id).await.unwrap().is_some());

        let guest_id = storage
            .create_guest(&NewGuest {
                first_name: "Wanjiru".to_string(),
                last_name: "Njoroge".to_string(),
                email: "wanjiru@example.com".to_string(),
                hotel_id: Some(hotel_id),
                contact_id: Some(contact_id),
                ..NewGuest::default()
            })
            .await
            .unwrap();
        let guest = storage.get_guest(guest_id).await.unwrap().unwrap();
        assert_eq!(guest.hotel_name.as_deref(), Some("Acacia Lodge"));

        let booking_id = storage
            .create_booking(&NewBooking {
                guest_name: "Wanjiru Njoroge".to_string(),
                check_in: "2026-09-01".to_string(),
                check_out: "2026-09-03".to_string(),
                room_type: "suite".to_string(),
                status: None,
            })
            .await
            .unwrap();
        let booking = storage.get_booking(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.status, "pending");

        storage.close().await.unwrap();
    }
}
