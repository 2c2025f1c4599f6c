// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking CRUD operations.

use rusqlite::{Row, params};

use innkeep_core::InnkeepError;

use crate::database::{Database, map_tr_err, now_utc};
use crate::models::{Booking, NewBooking};

const BOOKING_COLUMNS: &str =
    "id, guest_name, check_in, check_out, room_type, status, created_at, updated_at";

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        guest_name: row.get(1)?,
        check_in: row.get(2)?,
        check_out: row.get(3)?,
        room_type: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// List all bookings, newest first.
pub async fn list_bookings(db: &Database) -> Result<Vec<Booking>, InnkeepError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], booking_from_row)?;
            let mut bookings = Vec::new();
            for row in rows {
                bookings.push(row?);
            }
            Ok(bookings)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a booking by id.
pub async fn get_booking(db: &Database, id: i64) -> Result<Option<Booking>, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id], booking_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new booking (status defaults to `pending`) and return its id.
pub async fn create_booking(db: &Database, booking: &NewBooking) -> Result<i64, InnkeepError> {
    let booking = booking.clone();
    db.connection()
        .call(move |conn| {
            let now = now_utc();
            let status = booking.status.as_deref().unwrap_or("pending");
            conn.execute(
                "INSERT INTO bookings (guest_name, check_in, check_out, room_type, status,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    booking.guest_name,
                    booking.check_in,
                    booking.check_out,
                    booking.room_type,
                    status,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a booking's fields; returns false when the booking does not exist.
/// An unset status keeps the stored value.
pub async fn update_booking(
    db: &Database,
    id: i64,
    booking: &NewBooking,
) -> Result<bool, InnkeepError> {
    let booking = booking.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE bookings SET guest_name = ?2, check_in = ?3, check_out = ?4,
                     room_type = ?5, status = COALESCE(?6, status), updated_at = ?7
                 WHERE id = ?1",
                params![
                    id,
                    booking.guest_name,
                    booking.check_in,
                    booking.check_out,
                    booking.room_type,
                    booking.status,
                    now_utc(),
                ],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
