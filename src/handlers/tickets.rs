use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use common::TicketStatus;
use model::entities::ticket;
use serde::{Deserialize, Serialize};
use service::participants::{self, ParticipantInput};
use service::scan::wire_status;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for issuing a ticket to a named holder
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTicketRequest {
    /// Holder's full name; the first word is stored as the first name
    #[validate(length(min = 1, max = 255))]
    pub user_name: String,
    #[validate(email)]
    pub user_email: Option<String>,
}

/// Request body for issuing several tickets at once
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct BulkTicketsRequest {
    #[validate(length(min = 1, max = 1000), nested)]
    pub tickets: Vec<CreateTicketRequest>,
}

/// Ticket view of a participant row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub id: i32,
    pub event_id: i32,
    pub user_name: String,
    pub user_email: Option<String>,
    pub qr_code_token: String,
    pub status: TicketStatus,
    pub scanned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ticket::Model> for TicketResponse {
    fn from(model: ticket::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            user_name: model.holder_name(),
            user_email: model.email,
            qr_code_token: model.qr_code_token,
            status: wire_status(model.status),
            scanned_at: model.scanned_at,
            created_at: model.created_at,
        }
    }
}

/// List the tickets of an event
#[utoipa::path(
    get,
    path = "/events/{event_id}/tickets",
    tag = "tickets",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Tickets retrieved successfully", body = ApiResponse<Vec<TicketResponse>>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_tickets(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<TicketResponse>>>> {
    let tickets = participants::list_participants(&state.db, event_id).await?;
    Ok(Json(ApiResponse::ok(
        tickets.into_iter().map(TicketResponse::from).collect(),
        "Tickets retrieved successfully",
    )))
}

/// Issue a ticket; the holder also appears in the participant list
#[utoipa::path(
    post,
    path = "/events/{event_id}/tickets",
    tag = "tickets",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket created successfully", body = ApiResponse<TicketResponse>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_ticket(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateTicketRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TicketResponse>>)> {
    let input = ParticipantInput::from_holder(&request.user_name, request.user_email);
    let ticket = participants::create_participant(&state.db, event_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TicketResponse::from(ticket),
            "Ticket created successfully",
        )),
    ))
}

/// Issue several tickets in one transaction; nothing is written if one fails
#[utoipa::path(
    post,
    path = "/events/{event_id}/tickets/bulk",
    tag = "tickets",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    request_body = BulkTicketsRequest,
    responses(
        (status = 201, description = "Tickets created successfully", body = ApiResponse<Vec<TicketResponse>>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request), fields(count = request.tickets.len()))]
pub async fn create_tickets_bulk(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Valid(Json(request)): Valid<Json<BulkTicketsRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<TicketResponse>>>)> {
    let inputs = request
        .tickets
        .into_iter()
        .map(|t| ParticipantInput::from_holder(&t.user_name, t.user_email))
        .collect();
    let tickets = participants::create_tickets_bulk(&state.db, event_id, inputs).await?;
    info!(
        "User {} issued {} tickets for event {}",
        identity.user_id,
        tickets.len(),
        event_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            tickets.into_iter().map(TicketResponse::from).collect(),
            "Tickets created successfully",
        )),
    ))
}
