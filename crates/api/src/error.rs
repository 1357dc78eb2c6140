//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors are rendered as
//! `{"error_code": <status>, "error_message": "..."}`; server errors are
//! captured to Sentry and their details are never sent to the client.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::InventoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the inventory API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store, product or stock operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Authentication operation failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database operation failed outside a service.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Request body could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error_code: u16,
    pub error_message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Inventory(err) => match err {
                InventoryError::NotStored { .. }
                | InventoryError::InvalidInput(_)
                | InventoryError::Conflict(_) => StatusCode::CONFLICT,
                InventoryError::StoreNotFound(_) | InventoryError::ProductNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                InventoryError::Repository(err) => repository_status(err),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidRfc(_) => StatusCode::CONFLICT,
                AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::ItemNotStored { source, .. } | AuthError::Repository(source) => {
                    repository_status(source)
                }
                AuthError::TokenSigning(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(err) => repository_status(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message sent to the client.
    fn client_message(&self, status: StatusCode) -> String {
        match status {
            StatusCode::SERVICE_UNAVAILABLE => "Service unavailable".to_string(),
            s if s.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

const fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Connect { .. } | RepositoryError::Unavailable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Query { .. }
        | RepositoryError::DataCorruption(_)
        | RepositoryError::VerificationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error_code: status.as_u16(),
            error_message: self.client_message(status),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated API client.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_inventory_core::{EmailError, StoreCodeError};

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_validation_errors_are_conflicts() {
        let err = AppError::from(InventoryError::not_stored(
            "store",
            StoreCodeError::InvalidFormat("AA-1".to_owned()),
        ));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = AppError::from(AuthError::InvalidEmail(EmailError::MissingAtSymbol));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_errors() {
        let err = AppError::from(InventoryError::StoreNotFound("Z-99".to_owned()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = AppError::from(InventoryError::ProductNotFound {
            sku: "SKU1".to_owned(),
            store_code: "A-01".to_owned(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_repository_error_status() {
        let unavailable = RepositoryError::Unavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(
            AppError::from(unavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let failed = RepositoryError::VerificationFailed {
            table: "store",
            key: "id_store=1, store_code=A-01".to_owned(),
        };
        assert_eq!(
            AppError::from(InventoryError::Repository(failed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let conflict = RepositoryError::Conflict("store still has products".to_owned());
        assert_eq!(AppError::from(conflict).status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = body_of(AppError::NotFound("/nowhere".to_owned())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], 404);
        assert_eq!(body["error_message"], "Not found: /nowhere");
    }

    #[tokio::test]
    async fn test_server_error_details_are_hidden() {
        let err = RepositoryError::Query {
            table: "product",
            source: sqlx::Error::RowNotFound,
        };
        let (status, body) = body_of(AppError::from(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_message"], "Internal server error");
    }
}
