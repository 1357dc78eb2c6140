//! Bearer token issuing and verification (HS256 JWT).

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use store_inventory_core::UserId;

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::ApiUser;

/// Whether a token grants API access or only the right to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User name.
    pub sub: String,
    /// User ID.
    pub uid: UserId,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

/// An access token and a refresh token for the same user.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    /// Sign a token of `kind` for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, user: &ApiUser, kind: TokenKind) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            kind,
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::TokenSigning)
    }

    /// Sign an access token and a refresh token for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue_pair(&self, user: &ApiUser) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(user, TokenKind::Access)?,
            refresh_token: self.issue(user, TokenKind::Refresh)?,
        })
    }

    /// Verify `token` and check it is of the `expected` kind.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for an expired token and
    /// `AuthError::InvalidToken` for any other failure.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        if data.claims.kind != expected {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use secrecy::SecretString;

    use super::*;

    fn issuer(access_secs: u64) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: SecretString::from("kq7V$z2Lp9Xw!R4mT8bN3cJ6hF1sD5gA"),
            access_token_ttl: Duration::from_secs(access_secs),
            refresh_token_ttl: Duration::from_secs(86_400),
        })
    }

    fn user() -> ApiUser {
        ApiUser {
            id: UserId::new(7),
            username: "client@example.com".to_owned(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let issuer = issuer(3600);
        let token = issuer.issue(&user(), TokenKind::Access).unwrap();

        let claims = issuer.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "client@example.com");
        assert_eq!(claims.uid, UserId::new(7));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let issuer = issuer(3600);
        let pair = issuer.issue_pair(&user()).unwrap();

        assert!(matches!(
            issuer.verify(&pair.refresh_token, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
        assert!(issuer.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer(0);
        let token = issuer.issue(&user(), TokenKind::Access).unwrap();
        std::thread::sleep(Duration::from_millis(1100));

        assert!(matches!(
            issuer.verify(&token, TokenKind::Access),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = issuer(3600).issue(&user(), TokenKind::Access).unwrap();
        let other = TokenIssuer::new(&AuthConfig {
            jwt_secret: SecretString::from("Zr8!mQ2xW5vB9nK3$hT7cL1pF4sJ6gD0"),
            access_token_ttl: Duration::from_secs(3600),
            refresh_token_ttl: Duration::from_secs(3600),
        });

        assert!(matches!(
            other.verify(&token, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            issuer(3600).verify("not-a-token", TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }
}
