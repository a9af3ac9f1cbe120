//! The uniform `ApiResponse<T>` envelope

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Header carrying the total number of matches on list responses
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Envelope returned by every handler
///
/// ```rust
/// use employee_management::response::ApiResponse;
/// use axum::http::StatusCode;
///
/// let ok = ApiResponse::success("pong", StatusCode::OK);
/// let json = serde_json::to_value(&ok).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["data"]["response"], "pong");
/// assert_eq!(json["statusCode"], 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<ApiData<T>>,
    pub metadata: Option<ApiMetadata>,
    pub error: Option<ApiError>,
    pub status_code: u16,
}

/// Payload wrapper, serialized as `{"response": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub response: T,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadata {
    /// Number of rows matching the query
    pub total_items: u64,
    /// Requested page size
    pub offset: u64,
    /// Requested page, 1-indexed
    pub page: u64,
    /// `ceil(total_items / offset)`, with an offset of zero treated as one
    pub total_pages: u64,
}

impl ApiMetadata {
    /// ```rust
    /// use employee_management::response::ApiMetadata;
    ///
    /// assert_eq!(ApiMetadata::new(10, 3, 1).total_pages, 4);
    /// assert_eq!(ApiMetadata::new(10, 0, 1).total_pages, 10);
    /// assert_eq!(ApiMetadata::new(0, 10, 1).total_pages, 0);
    /// ```
    pub fn new(total_items: u64, offset: u64, page: u64) -> Self {
        Self {
            total_items,
            offset,
            page,
            total_pages: calculate_total_pages(total_items, offset),
        }
    }
}

/// Ceiling division that never divides by zero
pub fn calculate_total_pages(total_items: u64, offset: u64) -> u64 {
    total_items.div_ceil(offset.max(1))
}

/// Error details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    /// Sub-errors joined with "; "
    pub detail: String,
    pub inner_error: Option<String>,
    /// Stable code of a business-rule violation
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    /// HTTP status recorded in the envelope
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Payload, when present
    pub fn payload(&self) -> Option<&T> {
        self.data.as_ref().map(|data| &data.response)
    }

    /// Consume the envelope and return its payload
    pub fn into_payload(self) -> Option<T> {
        self.data.map(|data| data.response)
    }

    /// Stable error code, when the envelope carries a business-rule violation
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_deref())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// List envelope rendered with partial-content semantics
///
/// A successful list with rows answers 206 and an `X-Total-Count` header; an
/// empty successful list answers 204 without a body. Failures render as the
/// wrapped envelope.
#[derive(Debug, Clone)]
pub struct ListResponse<T>(pub ApiResponse<Vec<T>>);

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        let ListResponse(mut envelope) = self;
        if !envelope.success {
            return envelope.into_response();
        }

        let rows = envelope.payload().map_or(0, Vec::len);
        if rows == 0 {
            return StatusCode::NO_CONTENT.into_response();
        }

        let total = envelope
            .metadata
            .map_or(rows as u64, |meta| meta.total_items);
        envelope.status_code = StatusCode::PARTIAL_CONTENT.as_u16();

        let mut response = envelope.into_response();
        if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
            response.headers_mut().insert(TOTAL_COUNT_HEADER, value);
        }
        response
    }
}
