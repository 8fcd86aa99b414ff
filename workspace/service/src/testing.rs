//! Shared fixtures for the service tests: an in-memory database with the real schema.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::entities::{event, event_admin, user};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::identity::Identity;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Inserts a user with a placeholder hash; tests that need a real hash go through `users`.
pub async fn seed_user(db: &DatabaseConnection, email: &str, is_superadmin: bool) -> Identity {
    let user = user::ActiveModel {
        email: Set(email.to_string()),
        name: Set(email.split('@').next().unwrap_or(email).to_string()),
        hashed_password: Set("unused".to_string()),
        is_superadmin: Set(is_superadmin),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed user");
    Identity::from(&user)
}

pub async fn seed_event(db: &DatabaseConnection, owner: &Identity, name: &str) -> event::Model {
    let event = event::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        date: Set(NaiveDate::from_ymd_opt(2025, 9, 20)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()),
        location: Set("Campus".to_string()),
        created_by_id: Set(owner.user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed event");

    event_admin::ActiveModel {
        event_id: Set(event.id),
        user_id: Set(owner.user_id),
        role: Set(event_admin::EventRole::Owner),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed owner row");

    event
}
