//! API user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Register (or re-register) an API client and print its tokens
//! inv-cli user authorize -u client@example.com -p 'Jm$_&1388' -r GODE561231GR8
//! ```
//!
//! # Environment Variables
//!
//! - `INVENTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `INVENTORY_JWT_SECRET` - Token signing secret, the same one the API uses

use store_inventory_api::config::{AuthConfig, ConfigError, DatabaseConfig};
use store_inventory_api::db::{self, RepositoryError};
use store_inventory_api::services::auth::{AuthError, AuthService, TokenIssuer, TokenPair};
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Authorization failed: {0}")]
    Auth(#[from] AuthError),
}

/// Validate and upsert API client credentials, returning fresh tokens.
///
/// # Errors
///
/// Returns an error if configuration is missing, the credentials are
/// invalid, or they cannot be stored.
pub async fn authorize(username: &str, password: &str, rfc: &str) -> Result<TokenPair, UserError> {
    dotenvy::dotenv().ok();

    let database = DatabaseConfig::from_env()?;
    let auth = AuthConfig::from_env()?;

    tracing::info!("Connecting to inventory database...");
    let pool = db::create_pool(&database).await?;
    let tokens = TokenIssuer::new(&auth);

    let authorization = AuthService::new(&pool, &tokens)
        .authorize(username, password, rfc)
        .await?;

    tracing::info!(
        "API user stored! ID: {}, User name: {}",
        authorization.user.id,
        authorization.user.username
    );

    Ok(authorization.tokens)
}
