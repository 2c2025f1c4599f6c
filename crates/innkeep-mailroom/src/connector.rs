// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mailbox connection lifecycle as an explicit state machine.
//!
//! The original callback-style connection handling (ready/error/end events)
//! is modeled here as a finite state machine with a single owned transport,
//! driven by the poller's task loop. Reconnects are scheduled with
//! exponential backoff and are unbounded in count: this is a long-lived
//! background service, not a one-shot operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info, warn};

use innkeep_config::model::MailboxConfig;
use innkeep_core::InnkeepError;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    Disconnected,
    Connecting,
    Authenticated,
    MailboxOpen,
}

impl std::fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectorState::Disconnected => "disconnected",
            ConnectorState::Connecting => "connecting",
            ConnectorState::Authenticated => "authenticated",
            ConnectorState::MailboxOpen => "mailbox-open",
        };
        f.write_str(s)
    }
}

/// Exponential reconnect backoff with a ceiling: `min(cap, base * 2^attempt)`.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
}

impl BackoffPolicy {
    /// Delay before reconnect attempt `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base.checked_mul(factor).unwrap_or(self.cap).min(self.cap)
    }
}

impl From<&MailboxConfig> for BackoffPolicy {
    fn from(config: &MailboxConfig) -> Self {
        Self {
            base: Duration::from_millis(config.backoff_base_ms),
            cap: Duration::from_millis(config.backoff_cap_ms),
        }
    }
}

/// One raw message as retrieved from the mailbox.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Mailbox sequence identifier.
    pub uid: u32,
    /// Full RFC822 byte stream.
    pub body: Vec<u8>,
}

/// Transport seam over the mailbox protocol.
///
/// The production implementation is [`ImapTransport`]; tests substitute a
/// scripted fake.
#[async_trait]
pub trait MailboxTransport: Send {
    /// Establish the connection and authenticate.
    async fn connect(&mut self) -> Result<(), InnkeepError>;

    /// Open (SELECT) the configured mailbox.
    async fn open_mailbox(&mut self) -> Result<(), InnkeepError>;

    /// Sequence identifiers strictly greater than `high_water`, ascending.
    /// An unset mark (0) returns all messages.
    async fn search_above(&mut self, high_water: u32) -> Result<Vec<u32>, InnkeepError>;

    /// Retrieve full raw bytes for the given identifiers. Identifiers the
    /// server does not answer for are simply absent from the result; the
    /// caller treats them as per-message fetch failures.
    async fn fetch_batch(&mut self, uids: &[u32]) -> Result<Vec<RawMessage>, InnkeepError>;

    /// Log out and drop the session.
    async fn disconnect(&mut self) -> Result<(), InnkeepError>;
}

/// Owns the transport and tracks the connection state machine.
pub struct MailboxConnector<T> {
    transport: T,
    state: ConnectorState,
    backoff: BackoffPolicy,
    attempts: u32,
}

impl<T: MailboxTransport> MailboxConnector<T> {
    pub fn new(transport: T, backoff: BackoffPolicy) -> Self {
        Self {
            transport,
            state: ConnectorState::Disconnected,
            backoff,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectorState::MailboxOpen
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drive the state machine to `mailbox-open`.
    ///
    /// On failure the connector returns to `disconnected` and reports the
    /// delay before the next attempt should be made. The attempt counter
    /// resets only on a successful `authenticated` transition.
    pub async fn open(&mut self) -> Result<(), (InnkeepError, Duration)> {
        self.transition(ConnectorState::Connecting);

        if let Err(e) = self.transport.connect().await {
            return Err(self.fail(e));
        }
        self.attempts = 0;
        self.transition(ConnectorState::Authenticated);

        if let Err(e) = self.transport.open_mailbox().await {
            return Err(self.fail(e));
        }
        self.transition(ConnectorState::MailboxOpen);
        Ok(())
    }

    /// Record a connection loss observed mid-cycle and return the delay
    /// before the next reconnect attempt.
    pub fn connection_lost(&mut self) -> Duration {
        self.transition(ConnectorState::Disconnected);
        let delay = self.backoff.delay(self.attempts);
        self.attempts += 1;
        delay
    }

    /// Graceful shutdown: log out and return to `disconnected`.
    pub async fn disconnect(&mut self) -> Result<(), InnkeepError> {
        let result = self.transport.disconnect().await;
        self.transition(ConnectorState::Disconnected);
        result
    }

    fn fail(&mut self, error: InnkeepError) -> (InnkeepError, Duration) {
        self.transition(ConnectorState::Disconnected);
        let delay = self.backoff.delay(self.attempts);
        self.attempts += 1;
        (error, delay)
    }

    fn transition(&mut self, next: ConnectorState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "connector state transition");
            self.state = next;
        }
    }
}

type ImapStream = Compat<tokio_rustls::client::TlsStream<TcpStream>>;

/// Production transport over async-imap with rustls.
pub struct ImapTransport {
    config: MailboxConfig,
    session: Option<async_imap::Session<ImapStream>>,
}

impl ImapTransport {
    pub fn new(config: MailboxConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    fn session(&mut self) -> Result<&mut async_imap::Session<ImapStream>, InnkeepError> {
        self.session.as_mut().ok_or_else(|| InnkeepError::Connection {
            message: "no open mailbox session".to_string(),
            source: None,
        })
    }
}

#[async_trait]
impl MailboxTransport for ImapTransport {
    async fn connect(&mut self) -> Result<(), InnkeepError> {
        let host = self.config.host.clone();
        debug!(host = host.as_str(), port = self.config.port, "connecting to mailbox server");

        let tcp = TcpStream::connect((host.as_str(), self.config.port))
            .await
            .map_err(|e| InnkeepError::Connection {
                message: format!("TCP connect to {host}:{} failed: {e}", self.config.port),
                source: Some(Box::new(e)),
            })?;

        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = tokio_rustls::TlsConnector::from(Arc::new(tls_config));

        let server_name = rustls_pki_types::ServerName::try_from(host.clone()).map_err(|e| {
            InnkeepError::Connection {
                message: format!("invalid server name `{host}`: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        let tls = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| InnkeepError::Connection {
                message: format!("TLS handshake with {host} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let client = async_imap::Client::new(tls.compat());
        let session = client
            .login(&self.config.username, &self.config.password)
            .await
            .map_err(|(e, _)| InnkeepError::Connection {
                message: format!("login failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!(username = self.config.username.as_str(), "mailbox authenticated");
        self.session = Some(session);
        Ok(())
    }

    async fn open_mailbox(&mut self) -> Result<(), InnkeepError> {
        let mailbox = self.config.mailbox.clone();
        let session = self.session()?;
        let status = session
            .select(&mailbox)
            .await
            .map_err(|e| InnkeepError::Connection {
                message: format!("SELECT {mailbox} failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(
            mailbox = mailbox.as_str(),
            exists = status.exists,
            "mailbox opened"
        );
        Ok(())
    }

    async fn search_above(&mut self, high_water: u32) -> Result<Vec<u32>, InnkeepError> {
        let query = if high_water == 0 {
            "ALL".to_string()
        } else {
            format!("UID {}:*", high_water + 1)
        };
        let session = self.session()?;

        let found = session
            .uid_search(&query)
            .await
            .map_err(|e| InnkeepError::Search {
                message: format!("UID SEARCH `{query}` failed: {e}"),
            })?;

        let mut uids: Vec<u32> = found.into_iter().collect();
        uids.sort_unstable();
        // A `UID n:*` query always answers with the highest-uid message,
        // even when its uid is below n; keep only strictly newer ones.
        uids.retain(|&uid| uid > high_water);
        Ok(uids)
    }

    async fn fetch_batch(&mut self, uids: &[u32]) -> Result<Vec<RawMessage>, InnkeepError> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }
        let set = uids
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let session = self.session()?;

        let fetches: Vec<async_imap::types::Fetch> = session
            .uid_fetch(&set, "(RFC822 UID)")
            .await
            .map_err(|e| InnkeepError::Fetch {
                uid: uids[0],
                message: format!("UID FETCH `{set}` failed: {e}"),
            })?
            .try_collect()
            .await
            .map_err(|e| InnkeepError::Fetch {
                uid: uids[0],
                message: format!("UID FETCH `{set}` stream failed: {e}"),
            })?;

        let mut messages = Vec::with_capacity(fetches.len());
        for fetch in &fetches {
            match (fetch.uid, fetch.body()) {
                (Some(uid), Some(body)) => messages.push(RawMessage {
                    uid,
                    body: body.to_vec(),
                }),
                (uid, _) => {
                    warn!(uid = ?uid, "fetch response without uid or body; skipping");
                }
            }
        }
        Ok(messages)
    }

    async fn disconnect(&mut self) -> Result<(), InnkeepError> {
        if let Some(mut session) = self.session.take() {
            // Best-effort logout; the connection may already be gone.
            if let Err(e) = session.logout().await {
                debug!(error = %e, "logout failed during disconnect");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted transport: fails `connect_failures` times, then succeeds.
    struct ScriptedTransport {
        connect_failures: u32,
        connect_calls: u32,
        open_calls: u32,
        disconnected: bool,
    }

    impl ScriptedTransport {
        fn failing(times: u32) -> Self {
            Self {
                connect_failures: times,
                connect_calls: 0,
                open_calls: 0,
                disconnected: false,
            }
        }
    }

    #[async_trait]
    impl MailboxTransport for ScriptedTransport {
        async fn connect(&mut self) -> Result<(), InnkeepError> {
            self.connect_calls += 1;
            if self.connect_calls <= self.connect_failures {
                return Err(InnkeepError::Connection {
                    message: "scripted failure".to_string(),
                    source: None,
                });
            }
            Ok(())
        }

        async fn open_mailbox(&mut self) -> Result<(), InnkeepError> {
            self.open_calls += 1;
            Ok(())
        }

        async fn search_above(&mut self, _high_water: u32) -> Result<Vec<u32>, InnkeepError> {
            Ok(Vec::new())
        }

        async fn fetch_batch(&mut self, _uids: &[u32]) -> Result<Vec<RawMessage>, InnkeepError> {
            Ok(Vec::new())
        }

        async fn disconnect(&mut self) -> Result<(), InnkeepError> {
            self.disconnected = true;
            Ok(())
        }
    }

    fn policy() -> BackoffPolicy {
        BackoffPolicy {
            base: Duration::from_millis(5000),
            cap: Duration::from_millis(30_000),
        }
    }

    #[test]
    fn backoff_sequence_doubles_to_ceiling() {
        let policy = policy();
        let delays: Vec<u64> = (0..6).map(|n| policy.delay(n).as_millis() as u64).collect();
        assert_eq!(delays, vec![5000, 10_000, 20_000, 30_000, 30_000, 30_000]);
    }

    #[test]
    fn backoff_never_overflows_at_large_attempt_counts() {
        let policy = policy();
        assert_eq!(policy.delay(u32::MAX), Duration::from_millis(30_000));
    }

    #[tokio::test]
    async fn open_walks_the_state_machine() {
        let mut connector = MailboxConnector::new(ScriptedTransport::failing(0), policy());
        assert_eq!(connector.state(), ConnectorState::Disconnected);

        connector.open().await.unwrap();
        assert_eq!(connector.state(), ConnectorState::MailboxOpen);
        assert!(connector.is_open());
    }

    #[tokio::test]
    async fn failed_connects_back_off_exponentially() {
        let mut connector = MailboxConnector::new(ScriptedTransport::failing(4), policy());

        let mut delays = Vec::new();
        for _ in 0..4 {
            let (_, delay) = connector.open().await.unwrap_err();
            assert_eq!(connector.state(), ConnectorState::Disconnected);
            delays.push(delay.as_millis() as u64);
        }
        assert_eq!(delays, vec![5000, 10_000, 20_000, 30_000]);

        // Fifth attempt succeeds and resets the attempt counter.
        connector.open().await.unwrap();
        assert!(connector.is_open());

        // A later connection loss starts from the base delay again.
        let delay = connector.connection_lost();
        assert_eq!(delay, Duration::from_millis(5000));
        assert_eq!(connector.state(), ConnectorState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_logs_out_and_resets_state() {
        let mut connector = MailboxConnector::new(ScriptedTransport::failing(0), policy());
        connector.open().await.unwrap();

        connector.disconnect().await.unwrap();
        assert_eq!(connector.state(), ConnectorState::Disconnected);
        assert!(connector.transport_mut().disconnected);
    }
}
