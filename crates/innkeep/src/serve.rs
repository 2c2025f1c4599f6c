// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `innkeep serve` command implementation.
//!
//! Startup order: tracing, storage (migrations run on open), high-water
//! mark seed, mailroom service (when configured), gateway. Shutdown is the
//! reverse: ctrl-c cancels the token, the gateway drains, the mailroom logs
//! out, storage checkpoints and closes.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use innkeep_analysis::HttpAnalyzer;
use innkeep_config::model::InnkeepConfig;
use innkeep_core::{InnkeepError, StorageAdapter};
use innkeep_gateway::{AppState, GatewayConfig};
use innkeep_mailroom::{BackoffPolicy, ImapTransport, IngestPipeline, MailroomService};
use innkeep_storage::SqliteStorage;

/// Runs the `innkeep serve` command until interrupted.
pub async fn run_serve(config: InnkeepConfig) -> Result<(), InnkeepError> {
    init_tracing(&config.service.log_level);
    info!(name = config.service.name.as_str(), "starting innkeep serve");

    // Storage opens first; everything else shares it.
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let cancel = install_signal_handler();

    // Mailbox ingestion is optional; the API runs without it.
    let (mailroom_task, check_trigger) = if config.mailbox.enabled {
        let analyzer = Arc::new(HttpAnalyzer::new(&config.analysis)?);

        // Initialize the cursor from the store so restarts do not re-ingest
        // history (dedup would drop the rows anyway, but the search and
        // fetch work is saved).
        let seed = storage.max_ticket_uid().await?;
        info!(mark = seed, "mailbox cursor initialized from stored tickets");

        let pipeline = IngestPipeline::new(
            storage.clone(),
            analyzer,
            config.mailbox.batch_size,
            seed,
        );
        let transport = ImapTransport::new(config.mailbox.clone());
        let (service, handle) = MailroomService::new(
            transport,
            BackoffPolicy::from(&config.mailbox),
            pipeline,
            Duration::from_secs(config.mailbox.poll_interval_secs),
        );

        let task = tokio::spawn(service.run(cancel.clone()));
        let trigger: Arc<dyn Fn() -> bool + Send + Sync> =
            Arc::new(move || handle.check_now());
        (Some(task), Some(trigger))
    } else {
        info!("mailbox ingestion disabled by configuration");
        (None, None)
    };

    // The gateway runs in the foreground until cancellation.
    let state = AppState {
        store: storage.clone(),
        check_trigger,
        start_time: std::time::Instant::now(),
    };
    let gateway_config = GatewayConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let gateway_result = innkeep_gateway::start_server(&gateway_config, state, cancel.clone()).await;
    if let Err(e) = &gateway_result {
        error!(error = %e, "gateway exited with error");
        // Take the rest of the process down with the same shutdown path.
        cancel.cancel();
    }

    if let Some(task) = mailroom_task {
        if let Err(e) = task.await {
            warn!(error = %e, "mailroom task join failed");
        }
    }

    storage.close().await?;
    info!("innkeep serve shutdown complete");
    gateway_result
}

/// Cancel the returned token on ctrl-c (and SIGTERM on unix).
fn install_signal_handler() -> CancellationToken {
    let cancel = CancellationToken::new();

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("ctrl-c received, shutting down"),
                _ = sigterm.recv() => info!("SIGTERM received, shutting down"),
            }
        }
        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
            }
        }
        ctrl_c_cancel.cancel();
    });

    cancel
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("innkeep={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
