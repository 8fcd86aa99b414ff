use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a bulk student import.
///
/// Duplicates are expected on re-imports and never fail the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    /// Rows written to the directory
    pub inserted: u64,
    /// Rows dropped because the email was already known
    pub skipped_duplicates: u64,
}
