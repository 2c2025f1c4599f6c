// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hotel query operations with paginated, searchable listing.

use rusqlite::{Row, params};

use innkeep_core::InnkeepError;

use crate::database::{Database, map_tr_err, now_utc};
use crate::models::{Hotel, NewHotel};

const HOTEL_COLUMNS: &str = "id, name, location, sub_location, address, url, review_score, \
     number_of_reviews, market, segment, agreement, sales_process, created_at, updated_at";

fn hotel_from_row(row: &Row<'_>) -> rusqlite::Result<Hotel> {
    Ok(Hotel {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        sub_location: row.get(3)?,
        address: row.get(4)?,
        url: row.get(5)?,
        review_score: row.get(6)?,
        number_of_reviews: row.get(7)?,
        market: row.get(8)?,
        segment: row.get(9)?,
        agreement: row.get(10)?,
        sales_process: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Paginated hotel listing ordered by name, optionally filtered by a search
/// term matched against name, location, address, and market.
///
/// Returns the requested page and the total row count for the filter.
pub async fn list_hotels(
    db: &Database,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> Result<(Vec<Hotel>, i64), InnkeepError> {
    let search = search.map(|s| s.to_string());
    let offset = (page.max(1) - 1) * limit;
    db.connection()
        .call(move |conn| {
            let mut hotels = Vec::new();
            let total: i64;
            match &search {
                Some(term) => {
                    let pattern = format!("%{term}%");
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {HOTEL_COLUMNS} FROM hotels
                         WHERE name LIKE ?1 OR location LIKE ?1 OR address LIKE ?1 OR market LIKE ?1
                         ORDER BY name ASC LIMIT ?2 OFFSET ?3"
                    ))?;
                    let rows = stmt.query_map(params![pattern, limit, offset], hotel_from_row)?;
                    for row in rows {
                        hotels.push(row?);
                    }
                    total = conn.query_row(
                        "SELECT COUNT(*) FROM hotels
                         WHERE name LIKE ?1 OR location LIKE ?1 OR address LIKE ?1 OR market LIKE ?1",
                        params![pattern],
                        |row| row.get(0),
                    )?;
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY name ASC LIMIT ?1 OFFSET ?2"
                    ))?;
                    let rows = stmt.query_map(params![limit, offset], hotel_from_row)?;
                    for row in rows {
                        hotels.push(row?);
                    }
                    total = conn.query_row("SELECT COUNT(*) FROM hotels", [], |row| row.get(0))?;
                }
            }
            Ok((hotels, total))
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a hotel by id.
pub async fn get_hotel(db: &Database, id: i64) -> Result<Option<Hotel>, InnkeepError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = ?1"
            ))?;
            let mut rows = stmt.query_map(params![id], hotel_from_row)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new hotel and return its assigned id.
pub async fn create_hotel(db: &Database, hotel: &NewHotel) -> Result<i64, InnkeepError> {
    let hotel = hotel.clone();
    db.connection()
        .call(move |conn| {
            let now = now_utc();
            conn.execute(
                "INSERT INTO hotels (name, location, sub_location, address, url, review_score,
                     number_of_reviews, market, segment, agreement, sales_process,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    hotel.name,
                    hotel.location,
                    hotel.sub_location,
                    hotel.address,
                    hotel.url,
                    hotel.review_score,
                    hotel.number_of_reviews,
                    hotel.market,
                    hotel.segment,
                    hotel.agreement,
                    hotel.sales_process,
                    now,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a hotel's fields; returns false when the hotel does not exist.
pub async fn update_hotel(
    db: &Database,
    id: i64,
    hotel: &NewHotel,
) -> Result<bool, InnkeepError> {
    let hotel = hotel.clone();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE hotels SET name = ?2, location = ?3, sub_location = ?4, address = ?5,
                     url = ?6, review_score = ?7, number_of_reviews = ?8, market = ?9,
                     segment = ?10, agreement = ?11, sales_process = ?12, updated_at = ?13
                 WHERE id = ?1",
                params![
                    id,
                    hotel.name,
                    hotel.location,
                    hotel.sub_location,
                    hotel.address,
                    hotel.url,
                    hotel.review_score,
                    hotel.number_of_reviews,
                    hotel.market,
                    hotel.segment,
                    hotel.agreement,
                    hotel.sales_process,
                    now_utc(),
                ],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
