// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use innkeep_core::types::{Contact, NewContact};

use crate::error::ApiError;
use crate::server::AppState;

/// Response body for DELETE /contacts/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /contacts
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.store.list_contacts().await?))
}

/// GET /contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError> {
    match state.store.get_contact(id).await? {
        Some(contact) => Ok(Json(contact)),
        None => Err(ApiError::NotFound("Contact")),
    }
}

/// POST /contacts
pub async fn create_contact(
    State(state): State<AppState>,
    Json(body): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".to_string()));
    }
    let id = state.store.create_contact(&body).await?;
    let created = state
        .store
        .get_contact(id)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /contacts/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewContact>,
) -> Result<Json<Contact>, ApiError> {
    if !state.store.update_contact(id, &body).await? {
        return Err(ApiError::NotFound("Contact"));
    }
    let updated = state
        .store
        .get_contact(id)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;
    Ok(Json(updated))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.store.delete_contact(id).await? {
        return Err(ApiError::NotFound("Contact"));
    }
    Ok(Json(DeleteResponse {
        message: "Contact deleted successfully".to_string(),
    }))
}
