//! Constructors for the four envelope flavors

use axum::http::StatusCode;

use super::envelope::{ApiData, ApiError, ApiMetadata, ApiResponse};
use crate::domain::DomainError;

/// Message used when a generic error carries none
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";
/// Message of the not-found flavor
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
/// Message of the validation flavor
pub const VALIDATION_MESSAGE: &str = "Validation failed";

impl<T> ApiResponse<T> {
    /// Successful envelope wrapping `data`
    pub fn success(data: T, status: StatusCode) -> Self {
        Self {
            success: true,
            data: Some(ApiData { response: data }),
            metadata: None,
            error: None,
            status_code: status.as_u16(),
        }
    }

    /// Generic failure, status 500 unless changed with [`ApiResponse::with_status`]
    ///
    /// `errors` are joined with "; " into `error.detail`.
    pub fn error<I, S>(message: impl Into<String>, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let message = message.into();
        Self::failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError {
                message: if message.trim().is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    message
                },
                detail: join_errors(errors),
                ..ApiError::default()
            },
        )
    }

    /// Not-found failure (404)
    pub fn not_found(message: Option<String>) -> Self {
        Self::failure(
            StatusCode::NOT_FOUND,
            ApiError {
                message: message.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
                ..ApiError::default()
            },
        )
    }

    /// Validation failure (400) with the messages joined into `error.detail`
    pub fn validation<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::failure(
            StatusCode::BAD_REQUEST,
            ApiError {
                message: VALIDATION_MESSAGE.to_string(),
                detail: join_errors(errors),
                ..ApiError::default()
            },
        )
    }

    /// Failure describing a business-rule violation
    pub fn domain(err: &DomainError) -> Self {
        Self::failure(
            err.status_code(),
            ApiError {
                message: err.to_string(),
                code: Some(err.error_code().to_string()),
                ..ApiError::default()
            },
        )
    }

    /// Attach pagination metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: ApiMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Override the status code
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = status.as_u16();
        self
    }

    /// Attach a stable error code to a failure
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.code = Some(code.into());
        }
        self
    }

    /// Record a lower-level cause
    #[must_use]
    pub fn with_inner_error(mut self, inner: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.inner_error = Some(inner.into());
        }
        self
    }

    fn failure(status: StatusCode, error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            metadata: None,
            error: Some(error),
            status_code: status.as_u16(),
        }
    }
}

fn join_errors<I, S>(errors: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    errors
        .into_iter()
        .map(Into::into)
        .collect::<Vec<String>>()
        .join("; ")
}
