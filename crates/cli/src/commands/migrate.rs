//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! inv-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `INVENTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded at compile time.

use store_inventory_api::config::{ConfigError, DatabaseConfig};
use store_inventory_api::db::{self, RepositoryError};
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the inventory schema migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database cannot be
/// reached, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;

    tracing::info!("Connecting to inventory database...");
    let pool = db::create_pool(&config).await?;

    tracing::info!("Running inventory migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Inventory migrations complete!");
    Ok(())
}
