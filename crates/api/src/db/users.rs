//! API user repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use store_inventory_core::UserId;

use super::existence::{ExistenceKey, verify_written};
use super::{RepositoryError, finish};
use crate::models::{ApiUser, NewCredentials};

const TABLE: &str = "user_auth";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    username: String,
    last_update_date: DateTime<Utc>,
}

impl From<UserRow> for ApiUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            username: row.username,
            updated_at: row.last_update_date,
        }
    }
}

/// Repository for API user credentials.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by user name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ApiUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, last_update_date FROM inventory.user_auth WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        Ok(row.map(ApiUser::from))
    }

    /// Draw the next user ID from the table's sequence.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn next_user_id(&self) -> Result<UserId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT nextval(pg_get_serial_sequence('inventory.user_auth', 'user_id'))",
        )
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        i32::try_from(id)
            .map(UserId::new)
            .map_err(|_| RepositoryError::DataCorruption(format!("user id {id} out of range")))
    }

    /// Insert credentials for a new user name, or replace the password hash
    /// of an existing one, then verify the row inside the same transaction.
    /// The stored `user_id` and `password` of an existing user are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VerificationFailed` if the user is not
    /// visible afterwards, or another `RepositoryError` if the statement
    /// fails. The transaction is rolled back on every error.
    pub async fn upsert_credentials(
        &self,
        credentials: &NewCredentials,
    ) -> Result<ApiUser, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = upsert_credentials_in(&mut tx, credentials).await;
        finish(tx, TABLE, result).await
    }
}

async fn upsert_credentials_in(
    conn: &mut PgConnection,
    credentials: &NewCredentials,
) -> Result<ApiUser, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
        r"
        INSERT INTO inventory.user_auth (user_id, username, password, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO UPDATE SET
            password_hash = EXCLUDED.password_hash,
            last_update_date = NOW()
        RETURNING user_id, username, last_update_date
        ",
    )
    .bind(credentials.user_id.as_i32())
    .bind(&credentials.user_name)
    .bind(&credentials.password)
    .bind(&credentials.password_hash)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?;

    verify_written(&mut *conn, ExistenceKey::UserName(&row.username)).await?;

    Ok(ApiUser::from(row))
}
