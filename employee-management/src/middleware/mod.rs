//! Request middleware: request ids, bearer tokens and error correlation

pub mod error_context;
pub mod jwt;
pub mod request_tracking;
pub mod token;

pub use error_context::{error_context, ErrorContext};
pub use jwt::JwtAuth;
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
    REQUEST_ID_HEADER, SENSITIVE_HEADERS,
};
pub use token::{extract_token, Claims, TokenValidator};
