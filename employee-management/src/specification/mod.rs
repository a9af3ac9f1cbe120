//! Business-rule specifications checked before writes
//!
//! A specification either confirms the rule (`Ok(true)`) or fails with the
//! [`DomainError`](crate::domain::DomainError) describing the violation. It
//! never answers `Ok(false)`. Repository failures propagate as
//! [`Error::Repository`](crate::error::Error::Repository).
//!
//! Handlers evaluate specifications one after another, never concurrently.

mod document_unique;
mod email_unique;
mod employee_must_exist;

use std::future::Future;

use crate::error::Result;

pub use document_unique::EmployeeDocumentMustBeUnique;
pub use email_unique::EmployeeEmailMustBeUnique;
pub use employee_must_exist::EmployeeMustExist;

/// A business rule evaluated against repository state
pub trait Specification<T: ?Sized>: Send + Sync {
    /// `Ok(true)` when satisfied, otherwise the domain error for the violation
    fn is_satisfied_by(&self, candidate: &T) -> impl Future<Output = Result<bool>> + Send;
}
