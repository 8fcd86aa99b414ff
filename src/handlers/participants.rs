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
use service::participants::{self, ParticipantChanges, ParticipantInput};
use service::scan::wire_status;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a participant
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateParticipantRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub last_name: String,
    /// Graduating class, free text
    pub promo: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Price category, free text
    pub tarif: Option<String>,
}

impl From<CreateParticipantRequest> for ParticipantInput {
    fn from(request: CreateParticipantRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            promo: request.promo,
            email: request.email,
            tarif: request.tarif,
        }
    }
}

/// Request body for updating a participant; omitted fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateParticipantRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    pub promo: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub tarif: Option<String>,
}

/// Participant view of a ticket row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: i32,
    pub event_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub promo: Option<String>,
    pub email: Option<String>,
    pub tarif: Option<String>,
    /// Token encoded in the participant's QR code
    pub qr_code_token: String,
    pub status: TicketStatus,
    /// Set once the ticket has been accepted at the entrance
    pub scanned_at: Option<DateTime<Utc>>,
}

impl From<ticket::Model> for ParticipantResponse {
    fn from(model: ticket::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            first_name: model.first_name,
            last_name: model.last_name,
            promo: model.promo,
            email: model.email,
            tarif: model.tarif,
            qr_code_token: model.qr_code_token,
            status: wire_status(model.status),
            scanned_at: model.scanned_at,
        }
    }
}

/// List the participants of an event ordered by last name
#[utoipa::path(
    get,
    path = "/events/{event_id}/participants",
    tag = "participants",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Participants retrieved successfully", body = ApiResponse<Vec<ParticipantResponse>>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_participants(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<ParticipantResponse>>>> {
    let participants = participants::list_participants(&state.db, event_id).await?;
    debug!("Retrieved {} participants for event {}", participants.len(), event_id);
    Ok(Json(ApiResponse::ok(
        participants.into_iter().map(ParticipantResponse::from).collect(),
        "Participants retrieved successfully",
    )))
}

/// Register a participant; its ticket is issued in the same write
#[utoipa::path(
    post,
    path = "/events/{event_id}/participants",
    tag = "participants",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant created successfully", body = ApiResponse<ParticipantResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_participant(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateParticipantRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParticipantResponse>>)> {
    let participant =
        participants::create_participant(&state.db, event_id, ParticipantInput::from(request))
            .await?;
    info!(
        "User {} registered participant {} to event {}",
        identity.user_id, participant.id, event_id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ParticipantResponse::from(participant),
            "Participant created successfully",
        )),
    ))
}

/// Update a participant
#[utoipa::path(
    put,
    path = "/events/{event_id}/participants/{participant_id}",
    tag = "participants",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("participant_id" = i32, Path, description = "Participant ID"),
    ),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated successfully", body = ApiResponse<ParticipantResponse>),
        (status = 404, description = "Event or participant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_participant(
    Path((event_id, participant_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Valid(Json(request)): Valid<Json<UpdateParticipantRequest>>,
) -> ApiResult<Json<ApiResponse<ParticipantResponse>>> {
    let changes = ParticipantChanges {
        first_name: request.first_name,
        last_name: request.last_name,
        promo: request.promo,
        email: request.email,
        tarif: request.tarif,
    };
    let participant =
        participants::update_participant(&state.db, event_id, participant_id, changes).await?;
    Ok(Json(ApiResponse::ok(
        ParticipantResponse::from(participant),
        "Participant updated successfully",
    )))
}

/// Remove a participant and its ticket
#[utoipa::path(
    delete,
    path = "/events/{event_id}/participants/{participant_id}",
    tag = "participants",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("participant_id" = i32, Path, description = "Participant ID"),
    ),
    responses(
        (status = 200, description = "Participant deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Event or participant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_participant(
    Path((event_id, participant_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    participants::delete_participant(&state.db, event_id, participant_id).await?;
    Ok(Json(ApiResponse::ok(
        format!("Participant {} deleted", participant_id),
        "Participant deleted successfully",
    )))
}
