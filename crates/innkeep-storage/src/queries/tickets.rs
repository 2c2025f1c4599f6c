// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket query operations: insert, dedup lookup, high-water mark seed,
//! listing, and partial updates.

use rusqlite::{Row, params};

use innkeep_core::InnkeepError;

use crate::database::{Database, map_tr_err, now_utc};
use crate::models::{NewTicket, Ticket, TicketPatch};

const TICKET_COLUMNS: &str = "id, message_id, uid, subject, body, html_body, from_email, \
     category, priority, sentiment, extracted_info, processed, status, \
     hotel_id, contact_id, created_at, updated_at";

fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        message_id: row.get(1)?,
        uid: row.get(2)?,
        subject: row.get(3)?,
        body: row.get(4)?,
        html_body: row.get(5)?,
        from_email: row.get(6)?,
        category: row.get(7)?,
        priority: row.get(8)?,
        sentiment: row.get(9)?,
        extracted_info: row.get(10)?,
        processed: row.get(11)?,
        status: row.get(12)?,
        hotel_id: row.get(13)?,
        contact_id: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

/// Insert a new ticket and return its assigned id.
///
/// A UNIQUE violation on `message_id` surfaces as a `Persistence` error;
/// the dedup gate is expected to have checked first, the constraint is the
/// backstop against the read-then-write race.
pub async fn insert_ticket(db: &Database, ticket: &NewTicket) -> Result<i64, InnkeepError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            let now = now_utc();
            conn.execute(
                "INSERT INTO tickets (message_id, uid, subject, body, html_body, from_email,
                     category, priority, sentiment, extracted_info, processed, status,
                     hotel_id, contact_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    ticket.message_id,
                    ticket.uid,
                    ticket.subject,
                    ticket.body,
                    ticket.html_body,
                    ticket.from_email,
                    ticket.category,
                    ticket.priority,
                    ticket.sentiment,
                    ticket.extracted_info,
                    ticket.processed,
                    ticket.status,
                    ticket.hotel_id,
                    ticket.contact_id,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a ticket by id.
pub async fn get_ticket(db: &Database, id: i64) -> Result<Option<Ticket>, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id], ticket_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all tickets, newest first.
pub async fn list_tickets(db: &Database) -> Result<Vec<Ticket>, InnkeepError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], ticket_from_row)?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(map_tr_err)
}

/// The dedup gate query: find a ticket by its message identifier.
pub async fn find_by_message_id(
    db: &Database,
    message_id: &str,
) -> Result<Option<Ticket>, InnkeepError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE message_id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![message_id], ticket_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Highest mailbox sequence identifier among stored tickets, 0 when none.
///
/// Seeds the ingestion high-water mark at startup.
pub async fn max_uid(db: &Database) -> Result<u32, InnkeepError> {
    db.connection()
        .call(|conn| {
            let uid: u32 =
                conn.query_row("SELECT COALESCE(MAX(uid), 0) FROM tickets", [], |row| {
                    row.get(0)
                })?;
            Ok(uid)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update; unset patch fields keep their stored values.
/// Returns false when no ticket with the given id exists.
pub async fn update_ticket(
    db: &Database,
    id: i64,
    patch: &TicketPatch,
) -> Result<bool, InnkeepError> {
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE tickets SET
                     status = COALESCE(?2, status),
                     category = COALESCE(?3, category),
                     priority = COALESCE(?4, priority),
                     sentiment = COALESCE(?5, sentiment),
                     extracted_info = COALESCE(?6, extracted_info),
                     processed = COALESCE(?7, processed),
                     hotel_id = COALESCE(?8, hotel_id),
                     contact_id = COALESCE(?9, contact_id),
                     updated_at = ?10
                 WHERE id = ?1",
                params![
                    id,
                    patch.status,
                    patch.category,
                    patch.priority,
                    patch.sentiment,
                    patch.extracted_info,
                    patch.processed,
                    patch.hotel_id,
                    patch.contact_id,
                    now_utc(),
                ],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
