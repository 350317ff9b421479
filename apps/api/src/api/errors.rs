use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::repositories::RepositoryError;
use crate::domain::DomainError;

/// Authentication or authorization failure
///
/// Raised by the bearer-token extractor and by handlers that check roles.
/// `status` defaults to 401 when not given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AuthError {
    pub status: Option<StatusCode>,
    pub reason: String,
}

impl AuthError {
    /// Creates an auth error that uses the default status
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            status: None,
            reason: reason.into(),
        }
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::new(reason).with_status(StatusCode::UNAUTHORIZED)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(reason).with_status(StatusCode::FORBIDDEN)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Status the response will carry
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::UNAUTHORIZED)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), reason = %self.reason, "request rejected by auth");

        let body = Json(json!({
            "error": self.reason,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    /// Translated by [`AuthError`]'s own response
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Client-visible failure with a fixed status
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    /// Storage failure; details are logged, not returned
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => err.status(),
            ApiError::Request { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::Request { status, message } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            RepositoryError::Conflict(message) => Self::conflict(message),
            RepositoryError::Database(message) => Self::internal_server_error(message),
        }
    }
}
