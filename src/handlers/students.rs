use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ImportSummary;
use model::entities::student;
use serde::{Deserialize, Serialize};
use service::students::{self, StudentInput};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for adding a student to the directory
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Derived from the email domain when omitted
    pub is_external: Option<bool>,
}

impl From<CreateStudentRequest> for StudentInput {
    fn from(request: CreateStudentRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            is_external: request.is_external,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment of a first name, last name or email
    #[serde(default)]
    pub q: String,
}

/// Student response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_external: bool,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            is_external: model.is_external,
        }
    }
}

fn to_responses(students: Vec<student::Model>) -> Vec<StudentResponse> {
    students.into_iter().map(StudentResponse::from).collect()
}

/// List the student directory ordered by last name
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "Students retrieved successfully", body = ApiResponse<Vec<StudentResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<StudentResponse>>>> {
    let students = students::list_students(&state.db).await?;
    debug!("Retrieved {} students", students.len());
    Ok(Json(ApiResponse::ok(
        to_responses(students),
        "Students retrieved successfully",
    )))
}

/// Add a student; internal or external is inferred from the email domain
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateStudentRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StudentResponse>>)> {
    let student =
        students::create_student(&state.db, &state.classifier, StudentInput::from(request))
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            StudentResponse::from(student),
            "Student created successfully",
        )),
    ))
}

/// Add a guest from outside the institution
#[utoipa::path(
    post,
    path = "/students/external",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "External student created successfully", body = ApiResponse<StudentResponse>),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_external_student(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateStudentRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StudentResponse>>)> {
    let student =
        students::create_external_student(&state.db, StudentInput::from(request)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            StudentResponse::from(student),
            "External student created successfully",
        )),
    ))
}

/// Autocomplete over the directory, at most 20 results
#[utoipa::path(
    get,
    path = "/students/search",
    tag = "students",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = ApiResponse<Vec<StudentResponse>>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn search_students(
    Query(query): Query<SearchQuery>,
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
) -> ApiResult<Json<ApiResponse<Vec<StudentResponse>>>> {
    let students = students::search_students(&state.db, &query.q).await?;
    Ok(Json(ApiResponse::ok(
        to_responses(students),
        "Search completed successfully",
    )))
}

/// Import a CSV export of the directory (multipart field `file`)
///
/// Columns `first_name`, `last_name` and `email` are required, separated by `;` or `,`.
/// Known emails are skipped and counted.
#[utoipa::path(
    post,
    path = "/students/import-csv",
    tag = "students",
    request_body(content = String, content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 200, description = "Import completed", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Malformed CSV, nothing imported", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn import_students_csv(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<ImportSummary>>> {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {}", e)))?;
            data = Some(bytes);
            break;
        }
    }

    let Some(data) = data else {
        warn!("CSV import without a 'file' field");
        return Err(ApiError::BadRequest(
            "Missing multipart field 'file'".to_string(),
        ));
    };

    let summary = service::import::import_students(&state.db, &state.classifier, &data).await?;
    info!(
        "User {} imported students: {} inserted, {} skipped",
        identity.user_id, summary.inserted, summary.skipped_duplicates
    );
    Ok(Json(ApiResponse::ok(summary, "Import completed")))
}
