//! Authentication service.
//!
//! API clients register with an email user name, a password and their RFC.
//! Registration upserts the credentials and returns an access token and a
//! refresh token; protected routes accept the access token as a bearer
//! token.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenIssuer, TokenKind, TokenPair};

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use store_inventory_core::{Email, Password, Rfc};

use crate::db::UserRepository;
use crate::models::{ApiUser, NewCredentials};

const TABLE: &str = "user_auth";

/// Result of a successful authorization.
#[derive(Debug, Clone)]
pub struct Authorization {
    pub user: ApiUser,
    pub tokens: TokenPair,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Validate client credentials, store them and issue a token pair.
    ///
    /// The stored password is `"{password}_{rfc}"`, hashed with Argon2id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
    /// `AuthError::InvalidRfc` before any statement is issued, and
    /// `AuthError::ItemNotStored` if the credentials cannot be written.
    pub async fn authorize(
        &self,
        username: &str,
        password: &str,
        rfc: &str,
    ) -> Result<Authorization, AuthError> {
        let email = Email::parse(username)?;
        let password = Password::parse(password)?;
        let rfc = Rfc::parse(rfc)?;

        let client_password = format!("{}_{}", password.expose(), rfc);
        let password_hash = hash_password(&client_password)?;
        let user_id = self.users.next_user_id().await?;

        let user = self
            .upsert_credentials(&NewCredentials {
                user_id,
                user_name: email.into_inner(),
                password: client_password,
                password_hash,
            })
            .await?;

        let tokens = self.tokens.issue_pair(&user)?;
        tracing::info!(user_id = %user.id, "API client authorized");

        Ok(Authorization { user, tokens })
    }

    /// Insert credentials for a new user name, or replace the hash and
    /// timestamp of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ItemNotStored` naming the user and table on any
    /// database failure.
    pub async fn upsert_credentials(
        &self,
        credentials: &NewCredentials,
    ) -> Result<ApiUser, AuthError> {
        self.users
            .upsert_credentials(credentials)
            .await
            .map_err(|source| {
                tracing::error!(
                    user_id = %credentials.user_id,
                    user_name = %credentials.user_name,
                    error = %source,
                    "Credentials not stored"
                );
                AuthError::ItemNotStored {
                    user_id: credentials.user_id,
                    user_name: credentials.user_name.clone(),
                    table: TABLE,
                    source,
                }
            })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` or `AuthError::TokenExpired` for a
    /// bad token and `AuthError::UserNotFound` if the user no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .users
            .get_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.tokens.issue(&user, TokenKind::Access)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    use super::*;

    fn verify_password(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).unwrap();
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Jm$_&1388_GODE561231GR8").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Jm$_&1388_GODE561231GR8", &hash));
        assert!(!verify_password("Jm$_&1388", &hash));
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let first = hash_password("Jm$_&1388").unwrap();
        let second = hash_password("Jm$_&1388").unwrap();
        assert_ne!(first, second);
    }
}
