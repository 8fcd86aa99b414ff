//! Global student directory with autocomplete search.

use model::entities::student;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::email_domains::EmailClassifier;
use crate::error::{Result, ServiceError, is_unique_violation};
use crate::users::normalize_email;

/// Maximum number of students returned by a search.
pub const SEARCH_LIMIT: u64 = 20;

#[derive(Debug, Clone)]
pub struct StudentInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// When absent the flag is derived from the email domain.
    pub is_external: Option<bool>,
}

pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Ok(student::Entity::find()
        .order_by_asc(student::Column::LastName)
        .order_by_asc(student::Column::FirstName)
        .all(db)
        .await?)
}

async fn insert_student(
    db: &DatabaseConnection,
    input: StudentInput,
    is_external: bool,
) -> Result<student::Model> {
    let email = normalize_email(&input.email);
    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    let row = student::ActiveModel {
        search_key: Set(student::search_key(&first_name, &last_name, &email)),
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email.clone()),
        is_external: Set(is_external),
        ..Default::default()
    };

    match row.insert(db).await {
        Ok(student) => {
            info!(
                "Student {} created (external: {})",
                student.id, student.is_external
            );
            Ok(student)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!("Student email {} already registered", email);
            Err(ServiceError::Conflict(format!(
                "Email '{}' is already registered",
                email
            )))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(db, classifier))]
pub async fn create_student(
    db: &DatabaseConnection,
    classifier: &EmailClassifier,
    input: StudentInput,
) -> Result<student::Model> {
    let is_external = input
        .is_external
        .unwrap_or_else(|| classifier.is_external(&input.email));
    insert_student(db, input, is_external).await
}

/// Registers a guest from outside the institution regardless of the email domain.
#[instrument(skip(db))]
pub async fn create_external_student(
    db: &DatabaseConnection,
    input: StudentInput,
) -> Result<student::Model> {
    insert_student(db, input, true).await
}

/// Escapes the `LIKE` wildcards so user input only ever matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring search on first name, last name and email.
///
/// A blank query returns the first students by last name.
#[instrument(skip(db))]
pub async fn search_students(db: &DatabaseConnection, query: &str) -> Result<Vec<student::Model>> {
    let needle = query.trim().to_lowercase();
    if needle.contains(student::SEARCH_KEY_SEPARATOR) {
        return Ok(Vec::new());
    }

    let mut select = student::Entity::find();
    if !needle.is_empty() {
        let pattern = format!("%{}%", escape_like(&needle));
        let like = LikeExpr::new(pattern).escape('\\');
        select = select.filter(student::Column::SearchKey.like(like));
    }

    let students = select
        .order_by_asc(student::Column::LastName)
        .order_by_asc(student::Column::FirstName)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?;
    debug!("Search '{}' matched {} students", needle, students.len());
    Ok(students)
}
