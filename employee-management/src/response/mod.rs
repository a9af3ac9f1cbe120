//! Response envelope returned by every handler
//!
//! Four flavors are built through [`ApiResponse`] constructors:
//! [`success`](ApiResponse::success), [`error`](ApiResponse::error),
//! [`not_found`](ApiResponse::not_found) and
//! [`validation`](ApiResponse::validation). Business-rule failures use
//! [`domain`](ApiResponse::domain), which also records the stable error code.

mod builder;
mod envelope;

pub use builder::{DEFAULT_ERROR_MESSAGE, NOT_FOUND_MESSAGE, VALIDATION_MESSAGE};
pub use envelope::{
    calculate_total_pages, ApiData, ApiError, ApiMetadata, ApiResponse, ListResponse,
    TOTAL_COUNT_HEADER,
};
