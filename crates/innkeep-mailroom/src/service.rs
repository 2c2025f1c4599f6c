// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The poller: a single background task loop driving periodic ingestion.
//!
//! One loop owns the connector, the pipeline, and the high-water mark, so
//! fetch cycles never overlap and the mark has exactly one writer. The loop
//! wakes on the poll interval, on an on-demand trigger (the gateway's
//! check-imap endpoint), or on a scheduled reconnect deadline, and exits on
//! cancellation with a graceful logout.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use innkeep_core::InnkeepError;

use crate::connector::{BackoffPolicy, MailboxConnector, MailboxTransport};
use crate::pipeline::IngestPipeline;

/// Handle for requesting an out-of-band fetch cycle.
///
/// Requests signal the poller's own task loop rather than running a
/// competing cycle; sends are fire-and-forget.
#[derive(Clone)]
pub struct MailroomHandle {
    trigger_tx: mpsc::Sender<()>,
}

impl MailroomHandle {
    /// Request a fetch cycle. Returns false when the service is gone or the
    /// trigger queue is full (a cycle is already pending either way).
    pub fn check_now(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }
}

/// The background ingestion service.
pub struct MailroomService<T> {
    connector: MailboxConnector<T>,
    pipeline: IngestPipeline,
    poll_interval: Duration,
    trigger_rx: mpsc::Receiver<()>,
}

impl<T: MailboxTransport> MailroomService<T> {
    pub fn new(
        transport: T,
        backoff: BackoffPolicy,
        pipeline: IngestPipeline,
        poll_interval: Duration,
    ) -> (Self, MailroomHandle) {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        (
            Self {
                connector: MailboxConnector::new(transport, backoff),
                pipeline,
                poll_interval,
                trigger_rx,
            },
            MailroomHandle { trigger_tx },
        )
    }

    /// Run until cancelled. Connection failures are absorbed with backoff;
    /// cycle failures are logged and retried on the next tick. No error
    /// escapes to the hosting process.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            mark = self.pipeline.high_water_mark(),
            "mailroom service started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut reconnect_at: Option<Instant> = None;

        loop {
            let deadline = reconnect_at;
            let reconnect_sleep = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                _ = reconnect_sleep => {
                    debug!("reconnect deadline reached");
                    reconnect_at = None;
                }
                Some(()) = self.trigger_rx.recv() => {
                    info!("on-demand fetch cycle requested");
                }
            }

            // A tick that lands inside a backoff window does nothing; the
            // scheduled reconnect wake-up will run the cycle.
            if let Some(at) = reconnect_at {
                if Instant::now() < at {
                    debug!("reconnect backoff in effect; skipping cycle");
                    continue;
                }
                reconnect_at = None;
            }

            self.run_cycle(&mut reconnect_at).await;
        }

        if let Err(e) = self.connector.disconnect().await {
            debug!(error = %e, "mailbox disconnect during shutdown failed");
        }
        info!("mailroom service stopped");
    }

    /// Ensure the mailbox is open, then run one pipeline cycle. Entering
    /// `mailbox-open` runs the cycle immediately, so a fresh connection is
    /// drained without waiting for the next tick.
    async fn run_cycle(&mut self, reconnect_at: &mut Option<Instant>) {
        if !self.connector.is_open() {
            match self.connector.open().await {
                Ok(()) => {}
                Err((error, delay)) => {
                    warn!(
                        error = %error,
                        retry_in_ms = delay.as_millis() as u64,
                        "mailbox connect failed; reconnect scheduled"
                    );
                    *reconnect_at = Some(Instant::now() + delay);
                    return;
                }
            }
        }

        match self.pipeline.run_cycle(self.connector.transport_mut()).await {
            Ok(stats) if stats.discovered > 0 => {
                debug!(
                    created = stats.created,
                    duplicates = stats.duplicates,
                    failed = stats.failed,
                    "cycle finished"
                );
            }
            Ok(_) => {}
            Err(e @ InnkeepError::Connection { .. }) => {
                let delay = self.connector.connection_lost();
                warn!(
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64,
                    "connection lost mid-cycle; reconnect scheduled"
                );
                *reconnect_at = Some(Instant::now() + delay);
            }
            Err(e) => {
                // Search and other cycle-level failures: logged, next tick retries.
                warn!(error = %e, "fetch cycle aborted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::connector::RawMessage;
    use innkeep_config::model::StorageConfig;
    use innkeep_core::types::Analysis;
    use innkeep_core::{MessageAnalyzer, StorageAdapter};
    use innkeep_storage::SqliteStorage;

    struct CountingMailbox {
        searches: Arc<AtomicU32>,
        connect_failures: u32,
        connects: u32,
    }

    #[async_trait]
    impl MailboxTransport for CountingMailbox {
        async fn connect(&mut self) -> Result<(), InnkeepError> {
            self.connects += 1;
            if self.connects <= self.connect_failures {
                return Err(InnkeepError::Connection {
                    message: "scripted connect failure".to_string(),
                    source: None,
                });
            }
            Ok(())
        }

        async fn open_mailbox(&mut self) -> Result<(), InnkeepError> {
            Ok(())
        }

        async fn search_above(&mut self, _high_water: u32) -> Result<Vec<u32>, InnkeepError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn fetch_batch(&mut self, _uids: &[u32]) -> Result<Vec<RawMessage>, InnkeepError> {
            Ok(Vec::new())
        }

        async fn disconnect(&mut self) -> Result<(), InnkeepError> {
            Ok(())
        }
    }

    struct NullAnalyzer;

    #[async_trait]
    impl MessageAnalyzer for NullAnalyzer {
        async fn analyze(
            &self,
            _subject: &str,
            _body: &str,
            _from_email: &str,
        ) -> Result<Analysis, InnkeepError> {
            Ok(Analysis::fallback())
        }
    }

    async fn make_pipeline() -> (IngestPipeline, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("service.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (
            IngestPipeline::new(Arc::new(storage), Arc::new(NullAnalyzer), 10, 0),
            dir,
        )
    }

    fn policy() -> BackoffPolicy {
        BackoffPolicy {
            base: Duration::from_millis(50),
            cap: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn check_now_triggers_a_cycle_before_the_tick() {
        let searches = Arc::new(AtomicU32::new(0));
        let mailbox = CountingMailbox {
            searches: searches.clone(),
            connect_failures: 0,
            connects: 0,
        };
        let (pipeline, _dir) = make_pipeline().await;
        // Long interval: only the explicit trigger can cause a cycle
        // (besides the interval's immediate first tick).
        let (service, handle) =
            MailroomService::new(mailbox, policy(), pipeline, Duration::from_secs(3600));

        let cancel = CancellationToken::new();
        let task = tokio::spawn(service.run(cancel.clone()));

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let after_start = searches.load(Ordering::SeqCst);
        assert_eq!(after_start, 1);

        assert!(handle.check_now());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(searches.load(Ordering::SeqCst), after_start + 1);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn connect_failures_recover_via_backoff() {
        let searches = Arc::new(AtomicU32::new(0));
        let mailbox = CountingMailbox {
            searches: searches.clone(),
            connect_failures: 2,
            connects: 0,
        };
        let (pipeline, _dir) = make_pipeline().await;
        let (service, _handle) =
            MailroomService::new(mailbox, policy(), pipeline, Duration::from_secs(3600));

        let cancel = CancellationToken::new();
        let task = tokio::spawn(service.run(cancel.clone()));

        // Two failures at 50ms and 100ms backoff, then the third attempt
        // connects and runs a cycle immediately.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(searches.load(Ordering::SeqCst) >= 1, "cycle should run after reconnects");

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let searches = Arc::new(AtomicU32::new(0));
        let mailbox = CountingMailbox {
            searches,
            connect_failures: 0,
            connects: 0,
        };
        let (pipeline, _dir) = make_pipeline().await;
        let (service, handle) =
            MailroomService::new(mailbox, policy(), pipeline, Duration::from_millis(10));

        let cancel = CancellationToken::new();
        let task = tokio::spawn(service.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;

        cancel.cancel();
        task.await.unwrap();
        // After shutdown the trigger handle finds no receiver.
        assert!(!handle.check_now());
    }
}
