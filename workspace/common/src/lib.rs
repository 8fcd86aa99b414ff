//! Common transport-layer types shared between the backend and its clients
//! (scanner apps, admin UI). They mirror the handlers' payloads so clients can
//! deserialize API responses without duplicating shapes.

mod import;
mod scan;

pub use import::ImportSummary;
pub use scan::{ScanReason, ScanRequest, ScanResult, TicketStatus};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by every successful endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}
