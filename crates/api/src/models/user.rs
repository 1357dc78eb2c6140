//! API user domain types.

use chrono::{DateTime, Utc};

use store_inventory_core::UserId;

/// An API user (domain type). Credentials are never loaded into it.
#[derive(Debug, Clone)]
pub struct ApiUser {
    pub id: UserId,
    pub username: String,
    pub updated_at: DateTime<Utc>,
}

/// Credentials written by an authentication upsert.
///
/// `password` is the legacy plaintext column; `password_hash` is Argon2.
/// `Debug` is implemented manually to redact both.
#[derive(Clone)]
pub struct NewCredentials {
    pub user_id: UserId,
    pub user_name: String,
    pub password: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredentials")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
