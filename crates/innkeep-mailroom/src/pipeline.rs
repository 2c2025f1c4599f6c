// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-cycle ingestion: search, batched fetch, parse, dedup, analyze, write.
//!
//! Mark-advancement policy is at-least-once: the high-water mark advances
//! only after confirmed successful processing, in ascending uid order. The
//! first failed message in a cycle blocks further advancement; later
//! messages are still processed, and the dedup gate makes their refetch on
//! the next cycle a no-op.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use innkeep_core::types::{Analysis, NewTicket, Priority, TicketStatus};
use innkeep_core::{InnkeepError, MessageAnalyzer, StorageAdapter};

use crate::connector::{MailboxTransport, RawMessage};
use crate::cursor::MailboxCursor;
use crate::parser::{self, ParsedEmail};

/// What happened to one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A ticket was written.
    Created(i64),
    /// The dedup gate found an existing ticket; success, no-op.
    Duplicate,
}

/// Counters for one fetch cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub discovered: usize,
    pub created: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Orchestrates one fetch cycle over a connected transport.
pub struct IngestPipeline {
    store: Arc<dyn StorageAdapter>,
    analyzer: Arc<dyn MessageAnalyzer>,
    batch_size: usize,
    cursor: MailboxCursor,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        analyzer: Arc<dyn MessageAnalyzer>,
        batch_size: usize,
        initial_mark: u32,
    ) -> Self {
        Self {
            store,
            analyzer,
            batch_size: batch_size.max(1),
            cursor: MailboxCursor::new(initial_mark),
        }
    }

    /// Current high-water mark.
    pub fn high_water_mark(&self) -> u32 {
        self.cursor.mark()
    }

    /// Run one fetch cycle.
    ///
    /// A search failure aborts the cycle and is returned to the caller; all
    /// per-message failures are contained and counted in the stats.
    pub async fn run_cycle<T: MailboxTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<CycleStats, InnkeepError> {
        let mark = self.cursor.mark();
        let uids = transport.search_above(mark).await?;

        let mut stats = CycleStats {
            discovered: uids.len(),
            ..CycleStats::default()
        };
        if uids.is_empty() {
            debug!(mark, "no new messages");
            return Ok(stats);
        }
        info!(count = uids.len(), mark, "new messages discovered");

        // Once any message fails, the mark must not move past it; processing
        // continues so later tickets still get written this cycle.
        let mut advance_blocked = false;

        for chunk in uids.chunks(self.batch_size) {
            let raws = match transport.fetch_batch(chunk).await {
                Ok(raws) => raws,
                Err(e) => {
                    warn!(error = %e, first_uid = chunk[0], "batch fetch failed; skipping batch");
                    advance_blocked = true;
                    stats.failed += chunk.len();
                    continue;
                }
            };

            let mut by_uid: BTreeMap<u32, RawMessage> =
                raws.into_iter().map(|raw| (raw.uid, raw)).collect();

            // chunk is ascending, so completions are handled in uid order
            // regardless of the order the server answered in.
            for &uid in chunk {
                let Some(raw) = by_uid.remove(&uid) else {
                    warn!(uid, "message not returned by fetch; skipped this cycle");
                    advance_blocked = true;
                    stats.failed += 1;
                    continue;
                };

                match self.process_message(&raw).await {
                    Ok(MessageOutcome::Created(id)) => {
                        stats.created += 1;
                        debug!(uid, ticket_id = id, "message ingested");
                        if !advance_blocked {
                            self.cursor.advance(uid);
                        }
                    }
                    Ok(MessageOutcome::Duplicate) => {
                        stats.duplicates += 1;
                        if !advance_blocked {
                            self.cursor.advance(uid);
                        }
                    }
                    Err(e) => {
                        warn!(uid, error = %e, "message failed; will retry next cycle");
                        advance_blocked = true;
                        stats.failed += 1;
                    }
                }
            }
        }

        info!(
            created = stats.created,
            duplicates = stats.duplicates,
            failed = stats.failed,
            mark = self.cursor.mark(),
            "fetch cycle complete"
        );
        Ok(stats)
    }

    /// Parse, dedup, analyze, and persist a single message.
    async fn process_message(
        &mut self,
        raw: &RawMessage,
    ) -> Result<MessageOutcome, InnkeepError> {
        let parsed = parser::parse_message(&raw.body)?;

        // Dedup gate. Read-then-write without a transaction: the UNIQUE
        // constraint on message_id is the backstop under the single-writer
        // assumption.
        if let Some(existing) = self
            .store
            .find_ticket_by_message_id(&parsed.message_id)
            .await?
        {
            debug!(
                message_id = parsed.message_id.as_str(),
                ticket_id = existing.id,
                "message already ingested; skipping"
            );
            return Ok(MessageOutcome::Duplicate);
        }

        // Analysis failure is non-fatal: the ticket is written with
        // defaulted classification.
        let analysis = match self
            .analyzer
            .analyze(&parsed.subject, &parsed.text_body, &parsed.from_email)
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(
                    message_id = parsed.message_id.as_str(),
                    error = %e,
                    "analysis failed; using default classification"
                );
                Analysis::fallback()
            }
        };

        let ticket = build_ticket(&parsed, &analysis, raw.uid);
        let id = self.store.insert_ticket(&ticket).await?;
        info!(
            ticket_id = id,
            uid = raw.uid,
            subject = ticket.subject.as_str(),
            category = ticket.category.as_str(),
            priority = ticket.priority.as_str(),
            "ticket created from mailbox"
        );
        Ok(MessageOutcome::Created(id))
    }
}

/// Map parsed content plus classification into a ticket row.
fn build_ticket(parsed: &ParsedEmail, analysis: &Analysis, uid: u32) -> NewTicket {
    NewTicket {
        message_id: parsed.message_id.clone(),
        uid,
        subject: parsed.subject.clone(),
        body: parsed.text_body.clone(),
        html_body: parsed.html_body.clone(),
        from_email: parsed.from_email.clone(),
        category: analysis.category.clone(),
        priority: Priority::from_category(&analysis.category).to_string(),
        sentiment: analysis.sentiment_confidence,
        extracted_info: serde_json::to_string(&analysis.booking_info)
            .unwrap_or_else(|_| "{}".to_string()),
        processed: true,
        status: TicketStatus::Open.to_string(),
        hotel_id: None,
        contact_id: None,
    }
}
