//! Bearer token extractor for protected routes.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{Claims, TokenKind};
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// Reads `Authorization: Bearer <token>`, verifies it and yields its claims.
/// A missing header, a malformed or expired token, or a refresh token is
/// rejected with a JSON 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireBearer(claims): RequireBearer,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
#[derive(Debug)]
pub struct RequireBearer(pub Claims);

impl FromRequestParts<AppState> for RequireBearer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.tokens().verify(token, TokenKind::Access)?;

        tracing::Span::current().record("user", claims.sub.as_str());
        set_sentry_user(&claims.uid, &claims.sub);

        Ok(Self(claims))
    }
}

/// The token of an `Authorization: Bearer` header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
