//! Database operations for the inventory `PostgreSQL` schema.
//!
//! # Schema: `inventory`
//!
//! ## Tables
//!
//! - `store` - Physical stores, keyed by `id_store` and unique `store_code`
//! - `product` - Products per store, unique by `(product_sku, product_store_id)`
//! - `user_auth` - API users, unique by `username`
//!
//! Table and column names are fixed in each statement; only values are bound.
//! Every write runs in one transaction that is rolled back on any error.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p store-inventory-cli -- migrate
//! ```

pub mod existence;
pub mod products;
pub mod stock;
pub mod stores;
pub mod users;

use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use existence::{ExistenceKey, exists, find_row_id};
pub use products::ProductRepository;
pub use stock::StockRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The initial connection could not be established.
    #[error("cannot connect to database {database} on {host}: {source}")]
    Connect {
        host: String,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// The database stopped answering (pool timeout, I/O, TLS).
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A statement failed; the enclosing transaction was rolled back.
    #[error("database error on table {table}: {source}")]
    Query {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Constraint violation (unique code, products still referencing a store).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A row written in this transaction was not visible to the follow-up lookup.
    #[error("write to {table} could not be verified for {key}")]
    VerificationFailed { table: &'static str, key: String },
}

impl RepositoryError {
    /// Classify a sqlx error raised while working on `table`.
    #[must_use]
    pub fn from_sqlx(table: &'static str, error: sqlx::Error) -> Self {
        if matches!(
            error,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        ) {
            return Self::Unavailable(error);
        }

        if let sqlx::Error::Database(ref db_err) = error
            && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
        {
            return Self::Conflict(format!("{table}: {}", db_err.message()));
        }

        Self::Query {
            table,
            source: error,
        }
    }

    /// `map_err` adapter for statements on `table`.
    pub fn on(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |error| Self::from_sqlx(table, error)
    }
}

/// Create a `PostgreSQL` connection pool from the configured URL.
///
/// # Errors
///
/// Returns `RepositoryError::Connect` naming the host and database if the URL
/// is malformed or the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
    let options = connect_options(config)?;
    let host = options.get_host().to_owned();
    let database = options.get_database().unwrap_or_default().to_owned();

    pool_options(config)
        .connect_with(options)
        .await
        .map_err(|source| RepositoryError::Connect {
            host,
            database,
            source,
        })
}

/// Create a pool that connects on first use.
///
/// # Errors
///
/// Returns `RepositoryError::Connect` if the URL is malformed.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
    let options = connect_options(config)?;
    Ok(pool_options(config)
        .min_connections(0)
        .connect_lazy_with(options))
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, RepositoryError> {
    config
        .url
        .expose_secret()
        .parse::<PgConnectOptions>()
        .map_err(|source| RepositoryError::Connect {
            host: "<unparsed>".to_owned(),
            database: "<unparsed>".to_owned(),
            source,
        })
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.max_connections.min(2))
        .acquire_timeout(config.acquire_timeout)
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and return the error.
pub(crate) async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    table: &'static str,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(RepositoryError::on(table))?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::warn!(table, error = %rollback_error, "rollback failed");
            }
            tracing::warn!(table, error = %error, "transaction rolled back");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            RepositoryError::from_sqlx("store", sqlx::Error::PoolTimedOut),
            RepositoryError::Unavailable(_)
        ));
    }

    #[test]
    fn test_other_errors_carry_table() {
        let error = RepositoryError::from_sqlx("product", sqlx::Error::RowNotFound);
        assert!(matches!(error, RepositoryError::Query { table: "product", .. }));
        assert!(error.to_string().contains("product"));
    }

    #[test]
    fn test_verification_failed_display() {
        let error = RepositoryError::VerificationFailed {
            table: "store",
            key: "id_store=4, store_code=A-01".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "write to store could not be verified for id_store=4, store_code=A-01"
        );
    }
}
