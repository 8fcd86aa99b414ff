use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The addressed event, participant, student, user or ticket does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller is authenticated but not allowed to perform the operation
    #[error("{0}")]
    PermissionDenied(String),

    /// A unique email or token is already taken
    #[error("{0}")]
    Conflict(String),

    /// Malformed input, including structural CSV problems
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Error from the password hashing backend
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl ServiceError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", what, id))
    }
}

/// Whether a database error is a unique-constraint violation.
///
/// Falls back to the driver message for backends that do not classify errors.
pub fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    let message = err.to_string().to_lowercase();
    message.contains("unique constraint") || message.contains("duplicate key")
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
