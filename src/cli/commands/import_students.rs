use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{connect_and_migrate, Settings};

pub async fn import_students(csv_path: &str, settings: &Settings) -> Result<()> {
    info!("Importing students from {}", csv_path);
    let data = tokio::fs::read(csv_path)
        .await
        .with_context(|| format!("Failed to read CSV file '{}'", csv_path))?;
    debug!("Read {} bytes", data.len());

    let db = connect_and_migrate(&settings.database_url).await?;
    let classifier = settings.email_classifier();

    let summary = service::import::import_students(&db, &classifier, &data)
        .await
        .context("Student import failed")?;

    println!(
        "Imported {} students ({} duplicates skipped)",
        summary.inserted, summary.skipped_duplicates
    );
    Ok(())
}
