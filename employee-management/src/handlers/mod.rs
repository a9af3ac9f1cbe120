//! Use-case handlers
//!
//! Each handler orchestrates one request: validation, specification checks,
//! repository calls, and finally the [`ApiResponse`] envelope. Handlers take
//! their collaborators explicitly and know nothing about HTTP routing, so the
//! same function serves the axum routes and direct calls from tests.
//!
//! Validation failures and business-rule violations come back as `Ok`
//! envelopes. Only unexpected failures propagate as [`Error`].

mod customers;
mod employees;
mod login;
pub mod validation;

use axum::http::StatusCode;

use crate::error::{Error, Result};
use crate::repository::{OrderDirection, PageRequest, RepositoryErrorKind};
use crate::response::{ApiMetadata, ApiResponse};

pub use customers::{
    add_customer, change_customer, get_customer_by_key, get_customers, remove_customer,
    CustomerRequest, GetCustomersRequest, DEFAULT_CUSTOMER_SORT,
};
pub use employees::{
    add_employee, change_employee, get_employee_by_key, get_employees, remove_employee,
    AddEmployeeRequest, ChangeEmployeeRequest, GetEmployeesRequest, PhoneNumberRequest,
    DEFAULT_EMPLOYEE_SORT,
};
pub use login::{login, EmployeeProfile, LoginRequest, LoginResponse, INVALID_CREDENTIALS_MESSAGE};

/// Build a page request from list query parameters
///
/// `offset` is the page size. A blank sort field falls back to `default_sort`.
pub(crate) fn page_request(
    page: Option<i64>,
    offset: Option<i64>,
    field_name: Option<&str>,
    order: Option<&str>,
    default_sort: &str,
) -> PageRequest {
    let field = field_name
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(default_sort);
    let direction = order.map_or(OrderDirection::Ascending, OrderDirection::from_param);

    PageRequest::new(page.unwrap_or(0), offset.unwrap_or(0))
        .normalized()
        .sorted_by(field, direction)
}

/// Successful list envelope with pagination metadata
pub(crate) fn paged<T>(rows: Vec<T>, total: u64, request: &PageRequest) -> ApiResponse<Vec<T>> {
    let request = request.normalized();
    ApiResponse::success(rows, StatusCode::OK).with_metadata(ApiMetadata::new(
        total,
        request.page_size.unsigned_abs(),
        request.page.unsigned_abs(),
    ))
}

/// Turn a recoverable failure into an envelope, propagating everything else
///
/// Business-rule violations keep their code and status. A query the store
/// rejected as invalid, such as an unknown sort field, becomes a validation
/// envelope.
pub(crate) fn recover<T>(err: Error) -> Result<ApiResponse<T>> {
    match err {
        Error::Domain(e) => {
            tracing::warn!(error_code = e.error_code(), "Business rule violated: {}", e);
            Ok(ApiResponse::domain(&e))
        }
        Error::Repository(e) if e.kind == RepositoryErrorKind::ValidationFailed => {
            tracing::warn!(operation = %e.operation, "Query rejected: {}", e.message);
            Ok(ApiResponse::validation([e.message]))
        }
        other => Err(other),
    }
}

/// Validation envelope, logged once per request
pub(crate) fn invalid<T>(errors: Vec<String>) -> ApiResponse<T> {
    tracing::warn!(errors = errors.len(), "Request validation failed");
    ApiResponse::validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::repository::{RepositoryError, RepositoryOperation};
    use uuid::Uuid;

    #[test]
    fn test_page_request_defaults() {
        let request = page_request(None, None, None, None, "firstName");
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        let sort = request.sort.unwrap();
        assert_eq!(sort.field, "firstName");
        assert_eq!(sort.direction, OrderDirection::Ascending);
    }

    #[test]
    fn test_page_request_from_params() {
        let request = page_request(Some(3), Some(25), Some(" email "), Some("DESC"), "firstName");
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 25);
        let sort = request.sort.unwrap();
        assert_eq!(sort.field, "email");
        assert_eq!(sort.direction, OrderDirection::Descending);
    }

    #[test]
    fn test_paged_metadata() {
        let envelope = paged(vec![1, 2, 3], 10, &PageRequest::new(2, 3));
        let metadata = envelope.metadata.unwrap();
        assert_eq!(metadata.total_items, 10);
        assert_eq!(metadata.offset, 3);
        assert_eq!(metadata.page, 2);
        assert_eq!(metadata.total_pages, 4);
    }

    #[test]
    fn test_recover_domain_and_query_errors() {
        let envelope: ApiResponse<()> =
            recover(DomainError::EmployeeNotFound(Uuid::nil()).into()).unwrap();
        assert_eq!(envelope.status_code, 404);
        assert_eq!(envelope.error_code(), Some("EMPLOYEE_NOT_FOUND"));

        let envelope: ApiResponse<()> = recover(
            RepositoryError::validation_failed(
                RepositoryOperation::FindWithPagination,
                "Unknown sort field: salary",
            )
            .into(),
        )
        .unwrap();
        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.error.unwrap().detail, "Unknown sort field: salary");

        let err = recover::<()>(Error::Internal("boom".into())).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
