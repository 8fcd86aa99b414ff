use crate::handlers::{
    admin::{create_user, list_users, set_superadmin},
    auth::{login, me, signup},
    events::{
        add_event_admin, create_event, delete_event, get_event, get_event_admins, get_events,
        update_event,
    },
    health::health_check,
    participants::{create_participant, delete_participant, get_participants, update_participant},
    scan::scan_ticket,
    students::{
        create_external_student, create_student, get_students, import_students_csv,
        search_students,
    },
    tickets::{create_ticket, create_tickets_bulk, get_tickets},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Upper bound for request bodies, sized for student CSV exports.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        // Superadmin user management
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:user_id/superadmin", put(set_superadmin))
        // Events
        .route("/events", get(get_events).post(create_event))
        .route(
            "/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/events/:event_id/admins",
            get(get_event_admins).post(add_event_admin),
        )
        // Participants and tickets share one row per holder
        .route(
            "/events/:event_id/participants",
            get(get_participants).post(create_participant),
        )
        .route(
            "/events/:event_id/participants/:participant_id",
            put(update_participant).delete(delete_participant),
        )
        .route(
            "/events/:event_id/tickets",
            get(get_tickets).post(create_ticket),
        )
        .route("/events/:event_id/tickets/bulk", post(create_tickets_bulk))
        // Student directory
        .route("/students", get(get_students).post(create_student))
        .route("/students/external", post(create_external_student))
        .route("/students/search", get(search_students))
        .route("/students/import-csv", post(import_students_csv))
        // Entrance
        .route("/scan", post(scan_ticket))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process-global, so tests build routers without it
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
