//! Authentication error types.

use thiserror::Error;

use store_inventory_core::{EmailError, PasswordError, RfcError, UserId};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid user name (must be an email address).
    #[error("invalid username: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password does not meet the policy.
    #[error("password validation failed: {0}")]
    WeakPassword(#[from] PasswordError),

    /// Invalid client RFC.
    #[error("invalid rfc_client: {0}")]
    InvalidRfc(#[from] RfcError),

    /// Credentials could not be written.
    #[error("can't insert user_id {user_id} user_name {user_name} into {table}")]
    ItemNotStored {
        user_id: UserId,
        user_name: String,
        table: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Token is malformed, has a bad signature, or is of the wrong kind.
    #[error("invalid token")]
    InvalidToken,

    /// Token has expired.
    #[error("token has expired")]
    TokenExpired,

    /// Token subject no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
