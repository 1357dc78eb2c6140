//! Authorization route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Client credentials.
#[derive(Deserialize)]
pub struct AuthorizationRequest {
    pub username: String,
    pub password: String,
    pub rfc_client: String,
}

impl std::fmt::Debug for AuthorizationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("rfc_client", &self.rfc_client)
            .finish()
    }
}

/// Tokens issued to an authorized client.
#[derive(Debug, Serialize)]
pub struct AuthorizationResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token exchange request.
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// A fresh access token.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
}

/// Validate client credentials and issue tokens.
///
/// POST /api/ecommerce/authorization/
#[instrument(skip(state, payload))]
pub async fn authorize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AuthorizationRequest>, JsonRejection>,
) -> Result<Json<AuthorizationResponse>> {
    let Json(request) = payload?;

    let authorization = AuthService::new(state.pool(), state.tokens())
        .authorize(&request.username, &request.password, &request.rfc_client)
        .await?;

    Ok(Json(AuthorizationResponse {
        message: format!("Logged in as {}", authorization.user.username),
        access_token: authorization.tokens.access_token,
        refresh_token: authorization.tokens.refresh_token,
    }))
}

/// Exchange a refresh token for a new access token.
///
/// POST /api/ecommerce/authorization/refresh/
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>> {
    let Json(request) = payload?;

    let access_token = AuthService::new(state.pool(), state.tokens())
        .refresh(&request.refresh_token)
        .await?;

    Ok(Json(RefreshResponse {
        message: "Access token refreshed".to_string(),
        access_token,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_request_debug_redacts_password() {
        let request: AuthorizationRequest = serde_json::from_value(serde_json::json!({
            "username": "client@example.com",
            "password": "Jm$_&1388",
            "rfc_client": "GODE561231GR8"
        }))
        .unwrap();

        let debug = format!("{request:?}");
        assert!(debug.contains("client@example.com"));
        assert!(!debug.contains("Jm$_&1388"));
    }
}
