// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the REST API.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use innkeep_core::{InnkeepError, StorageAdapter};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The durable store shared with the ingestion pipeline.
    pub store: Arc<dyn StorageAdapter>,
    /// Fire-and-forget trigger for an out-of-band mailbox fetch cycle.
    /// `None` when ingestion is disabled by configuration.
    pub check_trigger: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("check_trigger", &self.check_trigger.as_ref().map(|_| "<fn>"))
            .field("start_time", &self.start_time)
            .finish()
    }
}

/// Gateway server configuration (mirrors ServerConfig from innkeep-config).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::get_health))
        .route(
            "/tickets",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route(
            "/tickets/check-imap",
            post(handlers::tickets::check_imap),
        )
        .route(
            "/tickets/{id}",
            get(handlers::tickets::get_ticket).put(handlers::tickets::update_ticket),
        )
        .route(
            "/hotels",
            get(handlers::hotels::list_hotels).post(handlers::hotels::create_hotel),
        )
        .route(
            "/hotels/{id}",
            get(handlers::hotels::get_hotel).put(handlers::hotels::update_hotel),
        )
        .route(
            "/contacts",
            get(handlers::contacts::list_contacts).post(handlers::contacts::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(handlers::contacts::get_contact)
                .put(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        )
        .route(
            "/guests",
            get(handlers::guests::list_guests).post(handlers::guests::create_guest),
        )
        .route(
            "/guests/{id}",
            get(handlers::guests::get_guest)
                .put(handlers::guests::update_guest)
                .delete(handlers::guests::delete_guest),
        )
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/bookings/{id}",
            get(handlers::bookings::get_booking).put(handlers::bookings::update_booking),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until cancellation.
pub async fn start_server(
    config: &GatewayConfig,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), InnkeepError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| InnkeepError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| InnkeepError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}
