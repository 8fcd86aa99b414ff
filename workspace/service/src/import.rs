//! Bulk import of the student directory from a CSV export.
//!
//! The whole file is parsed before anything is written: a structural problem rejects the
//! request with nothing inserted. Rows whose email already exists are skipped by the
//! database itself (`ON CONFLICT (email) DO NOTHING`), so the import can be replayed safely.

use common::ImportSummary;
use csv::{ReaderBuilder, StringRecord, Trim};
use model::entities::student;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::email_domains::EmailClassifier;
use crate::error::{Result, ServiceError};
use crate::users::normalize_email;

const FIRST_NAME_HEADERS: &[&str] = &["first_name", "firstname", "prenom", "prénom"];
const LAST_NAME_HEADERS: &[&str] = &["last_name", "lastname", "nom"];
const EMAIL_HEADERS: &[&str] = &["email", "mail", "e-mail"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// `;` unless the header line carries more commas than semicolons.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if commas > semicolons { b',' } else { b';' }
}

fn find_column(headers: &StringRecord, aliases: &[&str], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
        .ok_or_else(|| ServiceError::Validation(format!("Missing required column '{}'", name)))
}

pub fn parse_students_csv(data: &[u8]) -> Result<Vec<StudentRow>> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ServiceError::Validation("CSV file must be UTF-8 encoded".to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ServiceError::Validation("CSV file is empty".to_string()));
    }

    let delimiter = sniff_delimiter(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::Validation(format!("Unreadable CSV header: {}", e)))?
        .clone();
    let first_name_idx = find_column(&headers, FIRST_NAME_HEADERS, "first_name")?;
    let last_name_idx = find_column(&headers, LAST_NAME_HEADERS, "last_name")?;
    let email_idx = find_column(&headers, EMAIL_HEADERS, "email")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or_default();
            ServiceError::Validation(format!("Malformed CSV row at line {}: {}", line, e))
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        let row = StudentRow {
            first_name: field(first_name_idx),
            last_name: field(last_name_idx),
            email: normalize_email(&field(email_idx)),
        };
        if row.email.is_empty() || !row.email.contains('@') {
            return Err(ServiceError::Validation(format!(
                "Invalid email '{}' at line {}",
                row.email, line
            )));
        }
        if row.first_name.is_empty() || row.last_name.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Missing first or last name at line {}",
                line
            )));
        }
        rows.push(row);
    }

    debug!(
        "Parsed {} student rows (delimiter '{}')",
        rows.len(),
        delimiter as char
    );
    Ok(rows)
}

/// Parses and inserts a student CSV in one transaction, skipping known emails.
#[instrument(skip(db, classifier, data), fields(bytes = data.len()))]
pub async fn import_students(
    db: &DatabaseConnection,
    classifier: &EmailClassifier,
    data: &[u8],
) -> Result<ImportSummary> {
    let rows = parse_students_csv(data)?;
    let txn = db.begin().await?;
    let mut summary = ImportSummary::default();

    for row in rows {
        let is_external = classifier.is_external(&row.email);
        let search_key = student::search_key(&row.first_name, &row.last_name, &row.email);
        let active = student::ActiveModel {
            first_name: Set(row.first_name),
            last_name: Set(row.last_name),
            email: Set(row.email),
            is_external: Set(is_external),
            search_key: Set(search_key),
            ..Default::default()
        };
        let affected = student::Entity::insert(active)
            .on_conflict(
                OnConflict::column(student::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        if affected == 0 {
            summary.skipped_duplicates += 1;
        } else {
            summary.inserted += affected;
        }
    }

    txn.commit().await?;
    info!(
        "Student import finished: {} inserted, {} duplicates skipped",
        summary.inserted, summary.skipped_duplicates
    );
    Ok(summary)
}
