// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analyzer trait for the external classification service.

use async_trait::async_trait;

use crate::error::InnkeepError;
use crate::types::Analysis;

/// Adapter for the sentiment/classification service.
///
/// One synchronous request/response per message. Implementations do not
/// retry: on failure the caller writes the ticket with
/// [`Analysis::fallback`](crate::types::Analysis::fallback) values.
#[async_trait]
pub trait MessageAnalyzer: Send + Sync + 'static {
    /// Classifies one message and extracts structured booking fields.
    async fn analyze(
        &self,
        subject: &str,
        body: &str,
        from_email: &str,
    ) -> Result<Analysis, InnkeepError>;
}
