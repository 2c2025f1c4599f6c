// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact CRUD operations.

use rusqlite::{Row, params};

use innkeep_core::InnkeepError;

use crate::database::{Database, map_tr_err, now_utc};
use crate::models::{Contact, NewContact};

const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, company, position, created_at, updated_at";

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        company: row.get(5)?,
        position: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// List all contacts ordered by name.
pub async fn list_contacts(db: &Database) -> Result<Vec<Contact>, InnkeepError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY first_name, last_name"
            ))?;
            let rows = stmt.query_map([], contact_from_row)?;
            let mut contacts = Vec::new();
            for row in rows {
                contacts.push(row?);
            }
            Ok(contacts)
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a contact by id.
pub async fn get_contact(db: &Database, id: i64) -> Result<Option<Contact>, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id], contact_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new contact and return its assigned id.
pub async fn create_contact(db: &Database, contact: &NewContact) -> Result<i64, InnkeepError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            let now = now_utc();
            conn.execute(
                "INSERT INTO contacts (first_name, last_name, email, phone, company, position,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    contact.first_name,
                    contact.last_name,
                    contact.email,
                    contact.phone,
                    contact.company,
                    contact.position,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a contact's fields; returns false when the contact does not exist.
pub async fn update_contact(
    db: &Database,
    id: i64,
    contact: &NewContact,
) -> Result<bool, InnkeepError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE contacts SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5,
                     company = ?6, position = ?7, updated_at = ?8
                 WHERE id = ?1",
                params![
                    id,
                    contact.first_name,
                    contact.last_name,
                    contact.email,
                    contact.phone,
                    contact.company,
                    contact.position,
                    now_utc(),
                ],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a contact; returns false when the contact does not exist.
pub async fn delete_contact(db: &Database, id: i64) -> Result<bool, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("contacts.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_contact(first: &str, last: &str) -> NewContact {
        NewContact {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: Some("+254700000000".to_string()),
            company: Some("Coast Hotels Ltd".to_string()),
            position: Some("Reservations".to_string()),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete_lifecycle() {
        let (db, _dir) = setup_db().await;
        let id = create_contact(&db, &make_contact("Amina", "Odhiambo"))
            .await
            .unwrap();

        let contact = get_contact(&db, id).await.unwrap().unwrap();
        assert_eq!(contact.first_name, "Amina");
        assert_eq!(contact.email, "amina@example.com");

        let mut changed = make_contact("Amina", "Odhiambo");
        changed.position = Some("Front Office Manager".to_string());
        assert!(update_contact(&db, id, &changed).await.unwrap());
        let contact = get_contact(&db, id).await.unwrap().unwrap();
        assert_eq!(contact.position.as_deref(), Some("Front Office Manager"));

        assert!(delete_contact(&db, id).await.unwrap());
        assert!(get_contact(&db, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_by_name() {
        let (db, _dir) = setup_db().await;
        create_contact(&db, &make_contact("Zara", "Mwangi")).await.unwrap();
        create_contact(&db, &make_contact("Brian", "Kiptoo")).await.unwrap();

        let contacts = list_contacts(&db).await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].first_name, "Brian");
        assert_eq!(contacts[1].first_name, "Zara");
    }

    #[tokio::test]
    async fn delete_missing_contact_returns_false() {
        let (db, _dir) = setup_db().await;
        assert!(!delete_contact(&db, 123).await.unwrap());
    }
}
