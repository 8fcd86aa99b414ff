use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::handlers::auth::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use serde::{Deserialize, Serialize};
use service::users::{self, NewUser};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a user on someone's behalf
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub is_superadmin: bool,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SuperadminFlagRequest {
    pub is_superadmin: bool,
}

/// List every user account
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Caller is not a superadmin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = users::list_users(&state.db, &identity).await?;
    info!("Superadmin {} listed {} users", identity.user_id, users.len());
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    )))
}

/// Create a user, optionally as superadmin
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "admin",
    request_body = AdminCreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 403, description = "Caller is not a superadmin", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Valid(Json(request)): Valid<Json<AdminCreateUserRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    if let Err(denied) = identity.ensure_superadmin() {
        warn!("User {} tried to create an account", identity.user_id);
        return Err(denied.into());
    }

    let user = users::create_user(
        &state.db,
        NewUser {
            email: request.email,
            name: request.name,
            password: request.password,
            is_superadmin: request.is_superadmin,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(user), "User created successfully")),
    ))
}

/// Grant or revoke the superadmin flag
#[utoipa::path(
    put,
    path = "/admin/users/{user_id}/superadmin",
    tag = "admin",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = SuperadminFlagRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 403, description = "Caller is not a superadmin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_superadmin(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(request): Json<SuperadminFlagRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = users::set_superadmin(&state.db, &identity, user_id, request.is_superadmin).await?;
    Ok(Json(ApiResponse::ok(
        UserResponse::from(user),
        "User updated successfully",
    )))
}
