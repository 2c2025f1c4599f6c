// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest CRUD operations. Reads join the hotel name onto each row.

use rusqlite::{Row, params};

use innkeep_core::InnkeepError;

use crate::database::{Database, map_tr_err, now_utc};
use crate::models::{Guest, NewGuest};

const GUEST_SELECT: &str = "SELECT g.id, g.first_name, g.last_name, g.email, g.phone, \
     g.hotel_id, g.contact_id, h.name, g.created_at, g.updated_at \
     FROM guests g LEFT JOIN hotels h ON g.hotel_id = h.id";

fn guest_from_row(row: &Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        hotel_id: row.get(5)?,
        contact_id: row.get(6)?,
        hotel_name: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// List all guests, newest first, with the hotel name joined in.
pub async fn list_guests(db: &Database) -> Result<Vec<Guest>, InnkeepError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("{GUEST_SELECT} ORDER BY g.created_at DESC, g.id DESC"))?;
            let rows = stmt.query_map([], guest_from_row)?;
            let mut guests = Vec::new();
            for row in rows {
                guests.push(row?);
            }
            Ok(guests)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a guest by id.
pub async fn get_guest(db: &Database, id: i64) -> Result<Option<Guest>, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{GUEST_SELECT} WHERE g.id = ?1"))?;
            let mut rows = stmt.query_map(params![id], guest_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new guest and return its assigned id.
pub async fn create_guest(db: &Database, guest: &NewGuest) -> Result<i64, InnkeepError> {
    let guest = guest.clone();
    db.connection()
        .call(move |conn| {
            let now = now_utc();
            conn.execute(
                "INSERT INTO guests (first_name, last_name, email, phone, hotel_id, contact_id,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    guest.first_name,
                    guest.last_name,
                    guest.email,
                    guest.phone,
                    guest.hotel_id,
                    guest.contact_id,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a guest's fields; returns false when the guest does not exist.
pub async fn update_guest(db: &Database, id: i64, guest: &NewGuest) -> Result<bool, InnkeepError> {
    let guest = guest.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE guests SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5,
                     hotel_id = ?6, contact_id = ?7, updated_at = ?8
                 WHERE id = ?1",
                params![
                    id,
                    guest.first_name,
                    guest.last_name,
                    guest.email,
                    guest.phone,
                    guest.hotel_id,
                    guest.contact_id,
                    now_utc(),
                ],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a guest; returns false when the guest does not exist.
pub async fn delete_guest(db: &Database, id: i64) -> Result<bool, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM guests WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewHotel;
    use crate::queries::hotels::create_hotel;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("guests.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_guest(first: &str, hotel_id: Option<i64>) -> NewGuest {
        NewGuest {
            first_name: first.to_string(),
            last_name: "Njoroge".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            hotel_id,
            contact_id: None,
        }
    }

    #[tokio::test]
    async fn guest_listing_joins_hotel_name() {
        let (db, _dir) = setup_db().await;
        let hotel_id = create_hotel(
            &db,
            &NewHotel {
                name: "Acacia Lodge".to_string(),
                ..NewHotel::default()
            },
        )
        .await
        .unwrap();

        create_guest(&db, &make_guest("Wanjiru", Some(hotel_id))).await.unwrap();
        create_guest(&db, &make_guest("Otieno", None)).await.unwrap();

        let guests = list_guests(&db).await.unwrap();
        assert_eq!(guests.len(), 2);
        let linked = guests.iter().find(|g| g.first_name == "Wanjiru").unwrap();
        assert_eq!(linked.hotel_name.as_deref(), Some("Acacia Lodge"));
        let unlinked = guests.iter().find(|g| g.first_name == "Otieno").unwrap();
        assert!(unlinked.hotel_name.is_none());
    }

    #[tokio::test]
    async fn create_update_delete_lifecycle() {
        let (db, _dir) = setup_db().await;
        let id = create_guest(&db, &make_guest("Wanjiru", None)).await.unwrap();

        let mut changed = make_guest("Wanjiru", None);
        changed.phone = Some("+254711111111".to_string());
        assert!(update_guest(&db, id, &changed).await.unwrap());

        let guest = get_guest(&db, id).await.unwrap().unwrap();
        assert_eq!(guest.phone.as_deref(), Some("+254711111111"));

        assert!(delete_guest(&db, id).await.unwrap());
        assert!(get_guest(&db, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_guest_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_guest(&db, 7).await.unwrap().is_none());
    }
}
