//! Credential store: users, argon2 password hashes and the superadmin bootstrap.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use model::entities::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError, is_unique_violation};
use crate::identity::Identity;

/// Data needed to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub is_superadmin: bool,
}

/// Account created on startup when no user with this email exists yet.
#[derive(Clone)]
pub struct SuperadminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for SuperadminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperadminSeed")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::PasswordHash(e.to_string()))
}

/// Checks a plaintext password against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match PasswordHash::new(hashed_password) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[instrument(skip(db, new_user), fields(email = %new_user.email))]
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let email = normalize_email(&new_user.email);
    let hashed_password = hash_password(&new_user.password)?;

    let active = user::ActiveModel {
        email: Set(email.clone()),
        name: Set(new_user.name.trim().to_string()),
        hashed_password: Set(hashed_password),
        is_superadmin: Set(new_user.is_superadmin),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(user) => {
            info!("User created with ID: {}, email: {}", user.id, user.email);
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!("Email {} is already registered", email);
            Err(ServiceError::Conflict(format!(
                "Email '{}' is already registered",
                email
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &DatabaseConnection, user_id: i32) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(user_id).one(db).await?)
}

/// Returns the user matching the credentials, or `Unauthorized` without telling which
/// part was wrong.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());

    let user = find_by_email(db, email).await?.ok_or_else(invalid)?;
    if !verify_password(password, &user.hashed_password) {
        debug!("Password mismatch for user {}", user.id);
        return Err(invalid());
    }
    Ok(user)
}

pub async fn list_users(db: &DatabaseConnection, caller: &Identity) -> Result<Vec<user::Model>> {
    caller.ensure_superadmin()?;
    Ok(user::Entity::find()
        .order_by_asc(user::Column::Email)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn set_superadmin(
    db: &DatabaseConnection,
    caller: &Identity,
    user_id: i32,
    is_superadmin: bool,
) -> Result<user::Model> {
    caller.ensure_superadmin()?;
    let existing = find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id))?;

    let mut active: user::ActiveModel = existing.into();
    active.is_superadmin = Set(is_superadmin);
    let updated = active.update(db).await?;
    info!(
        "User {} superadmin flag set to {} by user {}",
        user_id, is_superadmin, caller.user_id
    );
    Ok(updated)
}

/// Creates the configured superadmin unless a user with that email already exists.
///
/// Returns the created user, or `None` when nothing had to be done.
#[instrument(skip(db))]
pub async fn ensure_initial_superadmin(
    db: &DatabaseConnection,
    seed: &SuperadminSeed,
) -> Result<Option<user::Model>> {
    if seed.email.trim().is_empty() || seed.password.is_empty() {
        warn!("Superadmin bootstrap skipped: email or password not configured");
        return Ok(None);
    }

    if find_by_email(db, &seed.email).await?.is_some() {
        debug!("Superadmin {} already present", seed.email);
        return Ok(None);
    }

    let name = if seed.name.trim().is_empty() {
        "Super Admin".to_string()
    } else {
        seed.name.clone()
    };

    let user = create_user(
        db,
        NewUser {
            email: seed.email.clone(),
            name,
            password: seed.password.clone(),
            is_superadmin: true,
        },
    )
    .await?;
    info!("Initial superadmin {} created", user.email);
    Ok(Some(user))
}
