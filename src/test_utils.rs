#[cfg(test)]
pub mod test_utils {
    use crate::auth::JwtKeys;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use axum::Router;
    use axum_test::{TestRequest, TestServer};
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use service::EmailClassifier;
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_JWT_SECRET: &str = "test-secret";
    pub const INTERNAL_DOMAIN: &str = "school.edu";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        AppState {
            db,
            jwt: Arc::new(JwtKeys::new(TEST_JWT_SECRET, 60)),
            classifier: Arc::new(EmailClassifier::new([INTERNAL_DOMAIN])),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable, defaulting to
    /// WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _ = init_test_tracing();
        create_router(setup_test_app_state().await)
    }

    /// Test server plus the state behind it, for tests that seed data directly.
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let _ = init_test_tracing();
        let state = setup_test_app_state().await;
        let server = TestServer::new(create_router(state.clone())).unwrap();
        (server, state)
    }

    /// Inserts a user with a placeholder hash and returns it with a valid access token.
    pub async fn seed_user(state: &AppState, email: &str, is_superadmin: bool) -> (user::Model, String) {
        let user = user::ActiveModel {
            email: Set(email.to_string()),
            name: Set(email.split('@').next().unwrap_or(email).to_string()),
            hashed_password: Set("not-a-hash".to_string()),
            is_superadmin: Set(is_superadmin),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .expect("Failed to seed user");
        let token = state.jwt.issue(user.id).unwrap();
        (user, token)
    }

    /// Adds an `Authorization: Bearer` header to a test request.
    pub fn authed(request: TestRequest, token: &str) -> TestRequest {
        request.add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }
}
