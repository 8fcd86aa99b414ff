use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDateTime;
use model::entities::{event, event_admin, user};
use serde::{Deserialize, Serialize};
use service::events::{self, EventChanges, EventInput};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new event
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Local date and time of the event (e.g. 2025-09-20T21:00:00)
    pub date: NaiveDateTime,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
}

/// Request body for updating an event; omitted fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
}

/// Event response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub location: String,
    pub created_by_id: i32,
}

impl From<event::Model> for EventResponse {
    fn from(model: event::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            date: model.date,
            location: model.location,
            created_by_id: model.created_by_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddEventAdminRequest {
    pub user_id: i32,
}

/// A user attached to an event with its role
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventAdminResponse {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    /// OWNER or ADMIN
    pub role: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl From<(event_admin::Model, Option<user::Model>)> for EventAdminResponse {
    fn from((admin, user): (event_admin::Model, Option<user::Model>)) -> Self {
        Self {
            id: admin.id,
            event_id: admin.event_id,
            user_id: admin.user_id,
            role: admin.role.as_str().to_string(),
            user_name: user.as_ref().map(|u| u.name.clone()),
            user_email: user.map(|u| u.email),
        }
    }
}

/// Create a new event; the caller becomes its owner
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = ApiResponse<EventResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateEventRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EventResponse>>)> {
    trace!("Entering create_event function");
    let event = events::create_event(
        &state.db,
        &identity,
        EventInput {
            name: request.name,
            description: request.description,
            date: request.date,
            location: request.location,
        },
    )
    .await?;

    info!("Event {} created by user {}", event.id, identity.user_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(EventResponse::from(event), "Event created successfully")),
    ))
}

/// List events ordered by date
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses(
        (status = 200, description = "Events retrieved successfully", body = ApiResponse<Vec<EventResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_events(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<EventResponse>>>> {
    let events = events::list_events(&state.db).await?;
    debug!("Retrieved {} events", events.len());
    Ok(Json(ApiResponse::ok(
        events.into_iter().map(EventResponse::from).collect(),
        "Events retrieved successfully",
    )))
}

/// Get a specific event by ID
#[utoipa::path(
    get,
    path = "/events/{event_id}",
    tag = "events",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Event retrieved successfully", body = ApiResponse<EventResponse>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_event(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    let event = events::get_event(&state.db, event_id).await?;
    Ok(Json(ApiResponse::ok(
        EventResponse::from(event),
        "Event retrieved successfully",
    )))
}

/// Update an event (owner or superadmin)
#[utoipa::path(
    put,
    path = "/events/{event_id}",
    tag = "events",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated successfully", body = ApiResponse<EventResponse>),
        (status = 403, description = "Caller may not manage this event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_event(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Valid(Json(request)): Valid<Json<UpdateEventRequest>>,
) -> ApiResult<Json<ApiResponse<EventResponse>>> {
    let changes = EventChanges {
        name: request.name,
        description: request.description,
        date: request.date,
        location: request.location,
    };
    let event = events::update_event(&state.db, &identity, event_id, changes).await?;
    Ok(Json(ApiResponse::ok(
        EventResponse::from(event),
        "Event updated successfully",
    )))
}

/// Delete an event with its participants and admins (owner or superadmin)
#[utoipa::path(
    delete,
    path = "/events/{event_id}",
    tag = "events",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Event deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Caller may not manage this event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_event(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<String>>> {
    events::delete_event(&state.db, &identity, event_id).await?;
    Ok(Json(ApiResponse::ok(
        format!("Event {} deleted", event_id),
        "Event deleted successfully",
    )))
}

/// List the users attached to an event
#[utoipa::path(
    get,
    path = "/events/{event_id}/admins",
    tag = "events",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Admins retrieved successfully", body = ApiResponse<Vec<EventAdminResponse>>),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_event_admins(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<EventAdminResponse>>>> {
    let admins = events::list_admins(&state.db, event_id).await?;
    Ok(Json(ApiResponse::ok(
        admins.into_iter().map(EventAdminResponse::from).collect(),
        "Admins retrieved successfully",
    )))
}

/// Grant the ADMIN role on an event (owner or superadmin)
#[utoipa::path(
    post,
    path = "/events/{event_id}/admins",
    tag = "events",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
    ),
    request_body = AddEventAdminRequest,
    responses(
        (status = 201, description = "Admin added successfully", body = ApiResponse<EventAdminResponse>),
        (status = 403, description = "Caller may not manage this event", body = ErrorResponse),
        (status = 404, description = "Event or user not found", body = ErrorResponse),
        (status = 409, description = "User already attached", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_event_admin(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<AddEventAdminRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EventAdminResponse>>)> {
    let admin = events::add_admin(&state.db, &identity, event_id, request.user_id).await?;
    let user = service::users::find_by_id(&state.db, admin.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            EventAdminResponse::from((admin, user)),
            "Admin added successfully",
        )),
    ))
}
