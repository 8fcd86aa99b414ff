use anyhow::Result;
use tracing::{error, info, trace};

use crate::config::{bootstrap_superadmin, connect_and_migrate, Settings};

pub async fn init_database(settings: &Settings) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    let db = match connect_and_migrate(&settings.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to prepare database '{}': {}", settings.database_url, e);
            return Err(e);
        }
    };

    bootstrap_superadmin(&db, settings).await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
