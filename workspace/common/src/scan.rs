use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ticket lifecycle as exposed over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Unused,
    Scanned,
    /// Reserved, never produced by the backend.
    Canceled,
}

/// Why a scan was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanReason {
    TicketNotFound,
    AlreadyScanned,
    TicketCanceled,
}

impl ScanReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanReason::TicketNotFound => "ticket_not_found",
            ScanReason::AlreadyScanned => "already_scanned",
            ScanReason::TicketCanceled => "ticket_canceled",
        }
    }
}

/// Body of `POST /scan`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Token read from the QR code
    pub token: String,
}

/// Verdict of a scan, echoing the ticket so the operator can check the holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScanResult {
    /// Whether the holder may enter
    pub valid: bool,
    /// Absent when `valid` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ScanReason>,
    pub ticket_id: Option<i32>,
    pub event_id: Option<i32>,
    pub event_name: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub status: Option<TicketStatus>,
    /// Time of the first accepted scan
    pub scanned_at: Option<DateTime<Utc>>,
}

impl ScanResult {
    /// Result for a token that matches no ticket.
    pub fn not_found() -> Self {
        Self {
            valid: false,
            reason: Some(ScanReason::TicketNotFound),
            ticket_id: None,
            event_id: None,
            event_name: None,
            user_name: None,
            user_email: None,
            status: None,
            scanned_at: None,
        }
    }
}
