// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Innkeep back office.
//!
//! These are the canonical definitions; the storage crate re-exports them
//! for convenience within its query modules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Ticket lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

/// Booking lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Ticket priority, derived from the analysis category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Normal,
}

impl Priority {
    /// Derive a priority from a classification category.
    ///
    /// Exact case-sensitive substring matching: categories containing
    /// `urgent` or `complaint` are high, categories containing `booking`
    /// are medium, everything else is normal. Callers needing
    /// case-insensitive matching must normalize the category first.
    pub fn from_category(category: &str) -> Self {
        if category.contains("urgent") || category.contains("complaint") {
            Priority::High
        } else if category.contains("booking") {
            Priority::Medium
        } else {
            Priority::Normal
        }
    }
}

/// Structured booking fields extracted by the classification service.
///
/// All fields are optional: the service returns whatever it could extract
/// and omits or nulls the rest. Absent fields are skipped on serialization
/// so an empty extraction serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_adults: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_children: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_nights: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

/// The result of classifying one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub category: String,
    pub category_confidence: f64,
    pub sentiment: String,
    pub sentiment_confidence: f64,
    #[serde(default)]
    pub booking_info: BookingInfo,
}

impl Analysis {
    /// The defaulted classification written when the analysis service is
    /// unreachable or errors: the ticket is persisted anyway.
    pub fn fallback() -> Self {
        Self {
            category: "uncategorized".to_string(),
            category_confidence: 0.0,
            sentiment: "neutral".to_string(),
            sentiment_confidence: 0.5,
            booking_info: BookingInfo::default(),
        }
    }
}

// --- Storage row types ---

/// A persisted support/booking inquiry, created manually or via ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    /// Unique across all tickets; the dedup gate checks this before insert.
    pub message_id: String,
    /// Mailbox sequence identifier; 0 for manually created tickets.
    pub uid: u32,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub from_email: String,
    pub category: String,
    pub priority: String,
    pub sentiment: f64,
    /// JSON blob of the typed [`BookingInfo`] extraction.
    pub extracted_info: String,
    pub processed: bool,
    pub status: String,
    pub hotel_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for inserting a new ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub message_id: String,
    pub uid: u32,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub from_email: String,
    pub category: String,
    pub priority: String,
    pub sentiment: f64,
    pub extracted_info: String,
    pub processed: bool,
    pub status: String,
    pub hotel_id: Option<i64>,
    pub contact_id: Option<i64>,
}

/// Partial ticket update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub sentiment: Option<f64>,
    #[serde(default)]
    pub extracted_info: Option<String>,
    #[serde(default)]
    pub processed: Option<bool>,
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub contact_id: Option<i64>,
}

/// A hotel in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub review_score: Option<f64>,
    pub number_of_reviews: Option<i64>,
    pub market: Option<String>,
    pub segment: Option<String>,
    pub agreement: Option<String>,
    pub sales_process: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating or replacing a hotel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewHotel {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sub_location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub review_score: Option<f64>,
    #[serde(default)]
    pub number_of_reviews: Option<i64>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub agreement: Option<String>,
    #[serde(default)]
    pub sales_process: Option<String>,
}

/// A hotel-side contact person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating or replacing a contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// A guest, optionally linked to a hotel and a contact.
///
/// `hotel_name` is populated from the hotels join on read; it is not a
/// stored column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hotel_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub hotel_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating or replacing a guest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub contact_id: Option<i64>,
}

/// A room booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub guest_name: String,
    pub check_in: String,
    pub check_out: String,
    pub room_type: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating or replacing a booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub guest_name: String,
    pub check_in: String,
    pub check_out: String,
    pub room_type: String,
    #[serde(default)]
    pub status: Option<String>,
}
