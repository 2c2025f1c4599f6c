// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking endpoints.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use innkeep_core::BookingStatus;
use innkeep_core::types::{Booking, NewBooking};

use crate::error::ApiError;
use crate::server::AppState;

fn validate_status(booking: &NewBooking) -> Result<(), ApiError> {
    if let Some(status) = &booking.status {
        BookingStatus::from_str(status)
            .map_err(|_| ApiError::BadRequest(format!("invalid status `{status}`")))?;
    }
    Ok(())
}

/// GET /bookings
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.store.list_bookings().await?))
}

/// GET /bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    match state.store.get_booking(id).await? {
        Some(booking) => Ok(Json(booking)),
        None => Err(ApiError::NotFound("Booking")),
    }
}

/// POST /bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    if body.guest_name.trim().is_empty() {
        return Err(ApiError::BadRequest("guest_name must not be empty".to_string()));
    }
    validate_status(&body)?;

    let id = state.store.create_booking(&body).await?;
    let created = state
        .store
        .get_booking(id)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewBooking>,
) -> Result<Json<Booking>, ApiError> {
    validate_status(&body)?;

    if !state.store.update_booking(id, &body).await? {
        return Err(ApiError::NotFound("Booking"));
    }
    let updated = state
        .store
        .get_booking(id)
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;
    Ok(Json(updated))
}
