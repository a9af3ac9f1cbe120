//! Error types and HTTP response conversion
//!
//! [`Error`] is the crate-level error. Validation and business-rule failures
//! are turned into [`ApiResponse`](crate::response::ApiResponse) envelopes by
//! the handlers; everything that still reaches [`IntoResponse`] here is an
//! unexpected failure and is answered with a generic body that carries the
//! request id as correlation identifier.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DomainError;
use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database connection or pool failure
    #[error("Database error: {0}")]
    Database(String),

    /// Business rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Repository failure with operation context
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Password hashing or token issuance failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// JWT encoding or decoding failure
    #[error("JWT error: {0}")]
    Jwt(Box<jsonwebtoken::errors::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Validation error (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
///
/// `details` carries the internal error text and is only rendered in
/// development environments; `correlation_id` is filled from the request id
/// by [`crate::middleware::error_context`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Stable machine-readable code
    pub code: String,
    /// User-facing message
    pub message: String,
    /// HTTP status code
    pub status: u16,
    /// Request id of the failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status: status.as_u16(),
            correlation_id: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Attach internal details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Copy of the body with correlation id set and details kept only when `expose_details`
    #[must_use]
    pub fn finalize(&self, correlation_id: Option<String>, expose_details: bool) -> Self {
        Self {
            correlation_id,
            details: if expose_details {
                self.details.clone()
            } else {
                None
            },
            ..self.clone()
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

impl Error {
    /// HTTP status and response body for this error
    pub fn to_error_response(&self) -> ErrorResponse {
        let details = self.to_string();
        let response = match self {
            Error::Config(_) => ErrorResponse::with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Service configuration error",
            ),

            Error::Database(_) => ErrorResponse::with_code(
                StatusCode::SERVICE_UNAVAILABLE,
                "DATABASE_UNAVAILABLE",
                "Database unavailable",
            ),

            Error::Domain(e) => ErrorResponse::with_code(e.status_code(), e.error_code(), e.to_string()),

            Error::Repository(e) => {
                let (status, message) = match e.kind {
                    RepositoryErrorKind::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                    RepositoryErrorKind::AlreadyExists | RepositoryErrorKind::ConstraintViolation => {
                        (StatusCode::CONFLICT, "Operation conflicts with existing data")
                    }
                    RepositoryErrorKind::ValidationFailed => {
                        (StatusCode::BAD_REQUEST, e.message.as_str())
                    }
                    RepositoryErrorKind::Timeout => {
                        (StatusCode::GATEWAY_TIMEOUT, "Database operation timed out")
                    }
                    RepositoryErrorKind::ConnectionFailed => {
                        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "Database operation failed"),
                };
                let code = format!("REPOSITORY_{}", e.kind.to_string().to_uppercase());
                ErrorResponse::with_code(status, code, message)
            }

            Error::Auth(_) => ErrorResponse::with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Authentication subsystem failure",
            ),

            Error::Jwt(_) => ErrorResponse::with_code(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),

            Error::Io(_) => ErrorResponse::with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                "I/O operation failed",
            ),

            Error::Unauthorized(msg) => {
                ErrorResponse::with_code(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }

            Error::ValidationError(msg) => {
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            Error::Internal(_) => ErrorResponse::with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        };
        response.with_details(details)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = self.to_error_response();

        match &self {
            Error::Repository(e) => tracing::error!(
                operation = %e.operation,
                kind = %e.kind,
                entity_type = ?e.entity_type,
                entity_id = ?e.entity_id,
                retriable = e.is_retriable(),
                "Repository error: {}", e.message
            ),
            Error::Domain(e) => tracing::error!(
                error_code = e.error_code(),
                "Unhandled domain error: {}", e
            ),
            other if body.status_code().is_server_error() => {
                tracing::error!(code = %body.code, "Unexpected error: {}", other)
            }
            other => tracing::warn!(code = %body.code, "Request failed: {}", other),
        }

        let mut response = body.clone().finalize(None, false).into_response();
        // full body kept for the error-context middleware
        response.extensions_mut().insert(body);
        response
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Jwt(Box::new(err))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;
    use uuid::Uuid;

    #[test]
    fn test_error_response_with_code() {
        let response =
            ErrorResponse::with_code(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Invalid input");
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.status, 400);
        assert!(response.details.is_none());
        assert!(response.correlation_id.is_none());
    }

    #[test]
    fn test_finalize_hides_details_outside_dev() {
        let response = Error::Internal("pool poisoned".into()).to_error_response();
        assert_eq!(response.details.as_deref(), Some("Internal server error: pool poisoned"));

        let public = response.finalize(Some("req_123".into()), false);
        assert!(public.details.is_none());
        assert_eq!(public.correlation_id.as_deref(), Some("req_123"));

        let dev = response.finalize(Some("req_123".into()), true);
        assert!(dev.details.is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let body = ErrorResponse::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", "gone")
            .finalize(Some("req_1".into()), false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["correlationId"], "req_1");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_repository_error_statuses() {
        let cases = [
            (
                RepositoryError::not_found("Employee", "1"),
                StatusCode::NOT_FOUND,
            ),
            (
                RepositoryError::already_exists("Employee", "ix_employees_email"),
                StatusCode::CONFLICT,
            ),
            (
                RepositoryError::validation_failed(RepositoryOperation::Find, "Unknown filter field: x"),
                StatusCode::BAD_REQUEST,
            ),
            (
                RepositoryError::timeout(RepositoryOperation::Find, "slow"),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                RepositoryError::connection_failed(RepositoryOperation::Find, "refused"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RepositoryError::database_error(RepositoryOperation::Add, "syntax"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(Error::from(err).to_error_response().status_code(), status);
        }
    }

    #[test]
    fn test_domain_error_keeps_code() {
        let err = Error::from(DomainError::EmployeeNotFound(Uuid::nil()));
        let body = err.to_error_response();
        assert_eq!(body.code, "EMPLOYEE_NOT_FOUND");
        assert_eq!(body.status, 404);
    }

    #[test]
    fn test_into_response_hides_internal_message() {
        let response = Error::Internal("secret connection string".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let full = response.extensions().get::<ErrorResponse>().unwrap();
        assert_eq!(full.message, "Internal server error");
        assert!(full.details.as_deref().unwrap().contains("secret"));
    }
}
