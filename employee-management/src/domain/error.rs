//! Business-rule failures with stable error codes

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Business rule violation raised by specifications and handlers
///
/// Every variant maps to a fixed `error_code()` and HTTP `status_code()`, so
/// clients can branch on the code without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No live employee carries the given id
    #[error("Employee with ID {0} was not found")]
    EmployeeNotFound(Uuid),

    /// Another employee already owns the email
    #[error("Employee with email {email} already exists with ID {existing_id}")]
    EmployeeEmailAlreadyExists {
        /// Conflicting email
        email: String,
        /// Id of the employee that owns it
        existing_id: Uuid,
    },

    /// Another employee already owns the document
    #[error("Employee with document {document} already exists with ID {existing_id}")]
    EmployeeDocumentAlreadyExists {
        /// Conflicting document, digits only
        document: String,
        /// Id of the employee that owns it
        existing_id: Uuid,
    },

    /// Input rejected by an employee rule
    #[error("Employee validation failed: {0}")]
    EmployeeValidation(String),

    /// The acting employee may not assign the requested role
    #[error("Role hierarchy violation: {actor} cannot assign role {target}")]
    EmployeeRoleHierarchy {
        /// Role held by the actor
        actor: String,
        /// Role the actor attempted to assign
        target: String,
    },

    /// A write was reported as not applied
    #[error("Employee operation '{operation}' failed: {reason}")]
    EmployeeOperation {
        /// Operation name
        operation: String,
        /// Why it failed
        reason: String,
    },

    #[error("Customer with ID {0} was not found")]
    CustomerNotFound(Uuid),

    /// Store or network failure surfaced inside a business flow
    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Stable machine readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::EmployeeEmailAlreadyExists { .. } => "EMPLOYEE_EMAIL_ALREADY_EXISTS",
            Self::EmployeeDocumentAlreadyExists { .. } => "EMPLOYEE_DOCUMENT_ALREADY_EXISTS",
            Self::EmployeeValidation(_) => "EMPLOYEE_VALIDATION_ERROR",
            Self::EmployeeRoleHierarchy { .. } => "EMPLOYEE_ROLE_HIERARCHY_ERROR",
            Self::EmployeeOperation { .. } => "EMPLOYEE_OPERATION_ERROR",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::Infrastructure(_) => "INFRASTRUCTURE_ERROR",
        }
    }

    /// HTTP status the failure maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmployeeNotFound(_) | Self::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            Self::EmployeeEmailAlreadyExists { .. }
            | Self::EmployeeDocumentAlreadyExists { .. }
            | Self::EmployeeValidation(_)
            | Self::EmployeeRoleHierarchy { .. } => StatusCode::BAD_REQUEST,
            Self::EmployeeOperation { .. } | Self::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the failure is a duplicate-field conflict
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::EmployeeEmailAlreadyExists { .. } | Self::EmployeeDocumentAlreadyExists { .. }
        )
    }
}
