// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hotel endpoints with paginated, searchable listing.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use innkeep_core::types::{Hotel, NewHotel};

use crate::error::ApiError;
use crate::server::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for GET /hotels.
#[derive(Debug, Deserialize)]
pub struct HotelListParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Pagination block echoed alongside the page of rows.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Response body for GET /hotels.
#[derive(Debug, Serialize)]
pub struct HotelListResponse {
    pub hotels: Vec<Hotel>,
    pub pagination: Pagination,
}

/// GET /hotels?page=&limit=&search=
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(params): Query<HotelListParams>,
) -> Result<Json<HotelListResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let search = params.search.as_deref().filter(|s| !s.trim().is_empty());

    let (hotels, total) = state.store.list_hotels(page, limit, search).await?;
    Ok(Json(HotelListResponse {
        hotels,
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        },
    }))
}

/// GET /hotels/{id}
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Hotel>, ApiError> {
    match state.store.get_hotel(id).await? {
        Some(hotel) => Ok(Json(hotel)),
        None => Err(ApiError::NotFound("Hotel")),
    }
}

/// POST /hotels
pub async fn create_hotel(
    State(state): State<AppState>,
    Json(body): Json<NewHotel>,
) -> Result<(StatusCode, Json<Hotel>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    let id = state.store.create_hotel(&body).await?;
    let created = state
        .store
        .get_hotel(id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /hotels/{id}
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewHotel>,
) -> Result<Json<Hotel>, ApiError> {
    if !state.store.update_hotel(id, &body).await? {
        return Err(ApiError::NotFound("Hotel"));
    }
    let updated = state
        .store
        .get_hotel(id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_all_optional() {
        let params: HotelListParams = serde_json::from_str("{}").unwrap();
        assert!(params.page.is_none());
        assert!(params.limit.is_none());
        assert!(params.search.is_none());
    }

    #[test]
    fn pagination_serializes_total_pages() {
        let resp = HotelListResponse {
            hotels: vec![],
            pagination: Pagination {
                total: 21,
                page: 1,
                limit: 10,
                total_pages: 3,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"total\":21"));
        assert!(json.contains("\"total_pages\":3"));
    }
}
