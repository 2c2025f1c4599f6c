// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket endpoints.
//!
//! Tickets come from two paths: manual creation here (classification fields
//! defaulted until an explicit analysis) and the ingestion pipeline. The
//! check-imap endpoint only signals the poller's task loop; it returns as
//! soon as the trigger is queued, never when the cycle completes.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use innkeep_core::types::{NewTicket, Ticket, TicketPatch};
use innkeep_core::{Priority, TicketStatus};

use crate::error::ApiError;
use crate::server::AppState;

/// Request body for POST /tickets.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub body: String,
    pub from_email: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub contact_id: Option<i64>,
}

/// Response body for POST /tickets/check-imap.
#[derive(Debug, Serialize)]
pub struct CheckImapResponse {
    pub message: String,
}

/// GET /tickets
pub async fn list_tickets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    Ok(Json(state.store.list_tickets().await?))
}

/// GET /tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    match state.store.get_ticket(id).await? {
        Some(ticket) => Ok(Json(ticket)),
        None => Err(ApiError::NotFound("Ticket")),
    }
}

/// POST /tickets
///
/// Manual ticket creation. Classification fields stay at their defaults;
/// the priority may be supplied explicitly.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(body): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    if body.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("subject must not be empty".to_string()));
    }
    let priority = match &body.priority {
        Some(p) => {
            Priority::from_str(p)
                .map_err(|_| ApiError::BadRequest(format!("invalid priority `{p}`")))?;
            p.clone()
        }
        None => Priority::Normal.to_string(),
    };

    let ticket = NewTicket {
        // Manual tickets have no mailbox identity; a time-based placeholder
        // keeps the dedup column unique, same approximation as the parser's.
        message_id: format!("manual-{}", chrono::Utc::now().timestamp_micros()),
        uid: 0,
        subject: body.subject,
        body: body.body,
        html_body: None,
        from_email: body.from_email,
        category: "uncategorized".to_string(),
        priority,
        sentiment: 0.5,
        extracted_info: "{}".to_string(),
        processed: false,
        status: TicketStatus::Open.to_string(),
        hotel_id: body.hotel_id,
        contact_id: body.contact_id,
    };

    let id = state.store.insert_ticket(&ticket).await?;
    let created = state
        .store
        .get_ticket(id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /tickets/{id}
///
/// Partial update of lifecycle and classification fields. Immutable
/// message/content fields are not updatable through this path.
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TicketPatch>,
) -> Result<Json<Ticket>, ApiError> {
    if let Some(status) = &patch.status {
        TicketStatus::from_str(status)
            .map_err(|_| ApiError::BadRequest(format!("invalid status `{status}`")))?;
    }
    if let Some(priority) = &patch.priority {
        Priority::from_str(priority)
            .map_err(|_| ApiError::BadRequest(format!("invalid priority `{priority}`")))?;
    }

    if !state.store.update_ticket(id, &patch).await? {
        return Err(ApiError::NotFound("Ticket"));
    }
    let updated = state
        .store
        .get_ticket(id)
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;
    Ok(Json(updated))
}

/// POST /tickets/check-imap
///
/// Fire-and-forget: queues one on-demand fetch cycle on the poller's loop
/// and returns 202 immediately. Returns 503 when ingestion is disabled.
pub async fn check_imap(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CheckImapResponse>), ApiError> {
    let Some(trigger) = &state.check_trigger else {
        return Err(ApiError::Unavailable("mailbox ingestion"));
    };

    // A full trigger queue means a cycle is already pending, which is as
    // good as triggered for the caller.
    let queued = trigger();
    info!(queued, "check-imap requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(CheckImapResponse {
            message: "mailbox check triggered".to_string(),
        }),
    ))
}
