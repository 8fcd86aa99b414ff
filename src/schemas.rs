use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use service::EmailClassifier;
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::auth::JwtKeys;
use crate::handlers::{
    admin::{AdminCreateUserRequest, SuperadminFlagRequest},
    auth::{LoginRequest, SignupRequest, TokenResponse, UserResponse},
    events::{
        AddEventAdminRequest, CreateEventRequest, EventAdminResponse, EventResponse,
        UpdateEventRequest,
    },
    participants::{CreateParticipantRequest, ParticipantResponse, UpdateParticipantRequest},
    students::{CreateStudentRequest, StudentResponse},
    tickets::{BulkTicketsRequest, CreateTicketRequest, TicketResponse},
};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Signing keys for access tokens
    pub jwt: Arc<JwtKeys>,
    /// Internal/external classification of student emails
    pub classifier: Arc<EmailClassifier>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::admin::list_users,
        crate::handlers::admin::create_user,
        crate::handlers::admin::set_superadmin,
        crate::handlers::events::create_event,
        crate::handlers::events::get_events,
        crate::handlers::events::get_event,
        crate::handlers::events::update_event,
        crate::handlers::events::delete_event,
        crate::handlers::events::get_event_admins,
        crate::handlers::events::add_event_admin,
        crate::handlers::participants::get_participants,
        crate::handlers::participants::create_participant,
        crate::handlers::participants::update_participant,
        crate::handlers::participants::delete_participant,
        crate::handlers::tickets::get_tickets,
        crate::handlers::tickets::create_ticket,
        crate::handlers::tickets::create_tickets_bulk,
        crate::handlers::students::get_students,
        crate::handlers::students::create_student,
        crate::handlers::students::create_external_student,
        crate::handlers::students::search_students,
        crate::handlers::students::import_students_csv,
        crate::handlers::scan::scan_ticket,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            SignupRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            AdminCreateUserRequest,
            SuperadminFlagRequest,
            CreateEventRequest,
            UpdateEventRequest,
            EventResponse,
            AddEventAdminRequest,
            EventAdminResponse,
            CreateParticipantRequest,
            UpdateParticipantRequest,
            ParticipantResponse,
            CreateTicketRequest,
            BulkTicketsRequest,
            TicketResponse,
            CreateStudentRequest,
            StudentResponse,
            common::ImportSummary,
            common::ScanRequest,
            common::ScanResult,
            common::ScanReason,
            common::TicketStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and current user"),
        (name = "admin", description = "Superadmin user management"),
        (name = "events", description = "Event catalog and event admins"),
        (name = "participants", description = "Participants of an event"),
        (name = "tickets", description = "Tickets of an event"),
        (name = "students", description = "Student directory and CSV import"),
        (name = "scan", description = "Entrance ticket validation"),
    ),
    info(
        title = "Ticketdesk API",
        description = "Event ticketing backend: events, participants, QR tickets, student directory and entrance scanning",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
