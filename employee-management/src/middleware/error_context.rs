//! Correlates error bodies with the request that produced them
//!
//! [`Error`](crate::error::Error) responses carry their full
//! [`ErrorResponse`] in the response extensions. This middleware re-renders
//! the body with the request id as `correlationId` and keeps the internal
//! `details` only when the service runs in a development environment.

use axum::{
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::request_tracking::REQUEST_ID_HEADER;
use crate::config::Config;
use crate::error::ErrorResponse;

/// State of the error-context middleware
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Render internal error details
    pub expose_details: bool,
}

impl ErrorContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            expose_details: config.service.is_development(),
        }
    }
}

/// Middleware function filling `correlationId` on error bodies
pub async fn error_context(
    State(ctx): State<ErrorContext>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let response = next.run(request).await;
    let Some(full) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let rendered = full
        .finalize(request_id, ctx.expose_details)
        .into_response();
    let (rendered_parts, body) = rendered.into_parts();

    parts.headers.remove(CONTENT_LENGTH);
    if let Some(content_type) = rendered_parts.headers.get(CONTENT_TYPE) {
        parts.headers.insert(CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}
