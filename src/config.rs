use anyhow::Result;
use config::{Config, Environment};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use service::users::{SuperadminSeed, ensure_initial_superadmin};
use service::EmailClassifier;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::JwtKeys;
use crate::schemas::AppState;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://ticketdesk.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_JWT_SECRET: &str = "change-this-secret-in-production";

/// Runtime settings, read from defaults and the process environment.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub superadmin_email: String,
    pub superadmin_password: String,
    pub superadmin_name: String,
    /// Domains whose addresses count as internal students (`INTERNAL_EMAIL_DOMAINS=a.fr,b.fr`)
    pub internal_email_domains: Vec<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_ttl_minutes", &self.jwt_ttl_minutes)
            .field("superadmin_email", &self.superadmin_email)
            .field("internal_email_domains", &self.internal_email_domains)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Loads `.env` if present, then layers environment variables over the defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings: Settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt_ttl_minutes", 60)?
            .set_default("superadmin_email", "admin@tdlog.local")?
            .set_default("superadmin_password", "changeme")?
            .set_default("superadmin_name", "Super Admin")?
            .set_default("internal_email_domains", Vec::<String>::new())?
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("internal_email_domains"),
            )
            .build()?
            .try_deserialize()?;

        if settings.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT_SECRET is not set, using the built-in development secret");
        }
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn superadmin_seed(&self) -> SuperadminSeed {
        SuperadminSeed {
            email: self.superadmin_email.clone(),
            password: self.superadmin_password.clone(),
            name: self.superadmin_name.clone(),
        }
    }

    pub fn email_classifier(&self) -> EmailClassifier {
        EmailClassifier::new(&self.internal_email_domains)
    }
}

/// Connects to the database and brings the schema up to date.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    info!("Running database migrations");
    Migrator::up(&db, None).await?;
    debug!("All pending migrations have been applied");
    Ok(db)
}

/// Creates the configured superadmin account if it does not exist yet.
pub async fn bootstrap_superadmin(db: &DatabaseConnection, settings: &Settings) -> Result<()> {
    if let Some(user) = ensure_initial_superadmin(db, &settings.superadmin_seed()).await? {
        info!("Initial superadmin {} created", user.email);
        if settings.superadmin_password == "changeme" {
            warn!("Superadmin uses the default password, change it after first login");
        }
    }
    Ok(())
}

/// Initialize application configuration and state
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let db = connect_and_migrate(&settings.database_url).await?;
    bootstrap_superadmin(&db, settings).await?;

    let classifier = settings.email_classifier();
    if classifier.domains().is_empty() {
        warn!("INTERNAL_EMAIL_DOMAINS is empty, every student will be marked external");
    }

    Ok(AppState {
        db,
        jwt: Arc::new(JwtKeys::new(&settings.jwt_secret, settings.jwt_ttl_minutes)),
        classifier: Arc::new(classifier),
    })
}
