// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest endpoints. Reads include the joined hotel name.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use innkeep_core::types::{Guest, NewGuest};

use crate::error::ApiError;
use crate::server::AppState;

/// Response body for DELETE /guests/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /guests
pub async fn list_guests(State(state): State<AppState>) -> Result<Json<Vec<Guest>>, ApiError> {
    Ok(Json(state.store.list_guests().await?))
}

/// GET /guests/{id}
pub async fn get_guest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Guest>, ApiError> {
    match state.store.get_guest(id).await? {
        Some(guest) => Ok(Json(guest)),
        None => Err(ApiError::NotFound("Guest")),
    }
}

/// POST /guests
pub async fn create_guest(
    State(state): State<AppState>,
    Json(body): Json<NewGuest>,
) -> Result<(StatusCode, Json<Guest>), ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".to_string()));
    }
    let id = state.store.create_guest(&body).await?;
    let created = state
        .store
        .get_guest(id)
        .await?
        .ok_or(ApiError::NotFound("Guest"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /guests/{id}
pub async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewGuest>,
) -> Result<Json<Guest>, ApiError> {
    if !state.store.update_guest(id, &body).await? {
        return Err(ApiError::NotFound("Guest"));
    }
    let updated = state
        .store
        .get_guest(id)
        .await?
        .ok_or(ApiError::NotFound("Guest"))?;
    Ok(Json(updated))
}

/// DELETE /guests/{id}
pub async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.store.delete_guest(id).await? {
        return Err(ApiError::NotFound("Guest"));
    }
    Ok(Json(DeleteResponse {
        message: "Guest deleted successfully".to_string(),
    }))
}
