// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MIME decoding of raw message bytes into a structured email.
//!
//! Pure transform, no I/O. Absent optional fields are substituted with
//! defaults so every parsed message can become a ticket: a missing subject
//! becomes "No Subject", a missing sender the sentinel address, and a
//! missing message identifier a time-based placeholder (an approximation,
//! not a cryptographically unique identifier).

use mail_parser::{MessageParser, MimeHeaders};

use innkeep_core::InnkeepError;

/// Substituted when a message carries no subject.
pub const DEFAULT_SUBJECT: &str = "No Subject";

/// Sentinel sender for messages without a usable From address.
pub const UNKNOWN_SENDER: &str = "unknown@email.com";

/// Attachment metadata; contents are not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentInfo {
    pub name: Option<String>,
    pub content_type: String,
    pub size: usize,
}

/// A decoded message, ready for the dedup gate and the analysis client.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEmail {
    pub message_id: String,
    pub subject: String,
    pub from_name: Option<String>,
    pub from_email: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub headers: Vec<(String, String)>,
    pub attachments: Vec<AttachmentInfo>,
}

/// Decode raw MIME bytes into a [`ParsedEmail`].
///
/// Byte streams that decode to no headers at all are rejected with a
/// `Parse` error and the message is skipped by the pipeline.
pub fn parse_message(raw: &[u8]) -> Result<ParsedEmail, InnkeepError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| InnkeepError::Parse {
            message: "byte stream is not valid MIME".to_string(),
        })?;

    let headers: Vec<(String, String)> = message
        .headers()
        .iter()
        .map(|header| (header.name().to_string(), header_value_text(header.value())))
        .collect();
    if headers.is_empty() {
        return Err(InnkeepError::Parse {
            message: "message has no headers".to_string(),
        });
    }

    let message_id = match message.message_id() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => synthesize_message_id(),
    };

    let subject = match message.subject() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => DEFAULT_SUBJECT.to_string(),
    };

    let sender = message.from().and_then(|addrs| addrs.first());
    let from_name = sender
        .and_then(|a| a.name())
        .map(|n| n.to_string())
        .filter(|n| !n.is_empty());
    let from_email = sender
        .and_then(|a| a.address())
        .filter(|a| !a.is_empty())
        .map(|a| a.to_string())
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    let html_body = if message.html_body_count() > 0 {
        message.body_html(0).map(|b| b.to_string())
    } else {
        None
    };

    let text_body = if message.text_body_count() > 0 {
        message.body_text(0).map(|b| b.to_string()).unwrap_or_default()
    } else if let Some(html) = &html_body {
        // HTML-only mail: render a plain-text view for analysis and storage.
        html2text::from_read(html.as_bytes(), 80).unwrap_or_default()
    } else {
        String::new()
    };

    let attachments = message
        .attachments()
        .map(|part| AttachmentInfo {
            name: part.attachment_name().map(|n| n.to_string()),
            content_type: part
                .content_type()
                .map(|ct| match ct.subtype() {
                    Some(sub) => format!("{}/{}", ct.ctype(), sub),
                    None => ct.ctype().to_string(),
                })
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size: part.contents().len(),
        })
        .collect();

    Ok(ParsedEmail {
        message_id,
        subject,
        from_name,
        from_email,
        text_body,
        html_body,
        headers,
        attachments,
    })
}

/// Placeholder identifier for messages without a Message-ID header, to avoid
/// dedup collisions between genuinely distinct unidentified messages.
fn synthesize_message_id() -> String {
    format!("no-id-{}", chrono::Utc::now().timestamp_millis())
}

/// Flatten a structured header value to display text.
fn header_value_text(value: &mail_parser::HeaderValue<'_>) -> String {
    use mail_parser::HeaderValue;

    match value {
        HeaderValue::Text(text) => text.to_string(),
        HeaderValue::TextList(list) => list
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        HeaderValue::Address(address) => address
            .first()
            .map(|a| match (a.name(), a.address()) {
                (Some(name), Some(email)) => format!("{name} <{email}>"),
                (_, Some(email)) => email.to_string(),
                (Some(name), None) => name.to_string(),
                (None, None) => String::new(),
            })
            .unwrap_or_default(),
        HeaderValue::DateTime(dt) => dt.to_rfc3339(),
        HeaderValue::ContentType(ct) => match ct.subtype() {
            Some(sub) => format!("{}/{}", ct.ctype(), sub),
            None => ct.ctype().to_string(),
        },
        _ => String::new(),
    }
}
