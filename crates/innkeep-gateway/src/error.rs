// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error responses for the REST API.
//!
//! Every error renders as a JSON body `{"message": ...}` with a
//! conventional status code. Ingestion-pipeline errors never reach this
//! layer; storage errors surface as opaque 500s with the detail logged
//! server-side only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use innkeep_core::InnkeepError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// API-level error with an HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    /// 404 with the entity name in the message.
    NotFound(&'static str),
    /// 400 for malformed or invalid request values.
    BadRequest(String),
    /// 503 when a required backend service is not configured.
    Unavailable(&'static str),
    /// 500; the underlying error is logged, not exposed.
    Internal(InnkeepError),
}

impl From<InnkeepError> for ApiError {
    fn from(err: InnkeepError) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unavailable(what) => {
                (StatusCode::SERVICE_UNAVAILABLE, format!("{what} is not available"))
            }
            ApiError::Internal(err) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_entity_name() {
        let response = ApiError::NotFound("Hotel").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_are_opaque() {
        let err = ApiError::Internal(InnkeepError::Persistence {
            source: "disk on fire".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_serializes() {
        let body = ErrorBody {
            message: "Guest not found".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Guest not found"}"#);
    }
}
