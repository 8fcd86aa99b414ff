use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::schemas::{AppState, ErrorResponse};
use axum::{extract::State, response::Json};
use chrono::Utc;
use common::{ScanRequest, ScanResult};
use tracing::{info, instrument};

/// Validate a ticket at the entrance
///
/// The first scan of an UNUSED ticket marks it SCANNED and is the only one reported as
/// valid; refusals still answer 200 with a `reason`.
#[utoipa::path(
    post,
    path = "/scan",
    tag = "scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan verdict", body = ScanResult),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn scan_ticket(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResult>> {
    let result = service::scan::scan_ticket(&state.db, &request.token, Utc::now()).await?;
    info!(
        "Scan by user {}: valid={} reason={:?}",
        identity.user_id,
        result.valid,
        result.reason.map(|r| r.as_str())
    );
    Ok(Json(result))
}
