//! Repository error types
//!
//! Structured errors for repository operations, so handlers can tell a
//! duplicate key from a dropped connection without parsing messages.
//!
//! # Example
//!
//! ```rust
//! use employee_management::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Employee", "0190c1d2-0000-7000-8000-000000000000");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Loading a single entity by id
    GetById,
    /// Loading every entity matching a filter
    Find,
    /// Loading one page of entities matching a filter
    FindWithPagination,
    /// Counting entities matching a filter
    Count,
    /// Inserting a new entity
    Add,
    /// Persisting changes to an existing entity
    Update,
    /// Soft deleting an entity
    Delete,
    /// Running a raw statement
    ExecuteRaw,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetById => write!(f, "get_by_id"),
            Self::Find => write!(f, "find"),
            Self::FindWithPagination => write!(f, "find_with_pagination"),
            Self::Count => write!(f, "count"),
            Self::Add => write!(f, "add"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::ExecuteRaw => write!(f, "execute_raw"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Entity already exists (unique index)
    AlreadyExists,
    /// Other database constraint violation
    ConstraintViolation,
    /// Query rejected before reaching the store
    ValidationFailed,
    /// Failed to reach the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Row could not be decoded into an entity
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// ```rust
/// use employee_management::repository::{RepositoryError, RepositoryOperation};
///
/// let error = RepositoryError::already_exists("Employee", "ix_employees_email")
///     .with_operation(RepositoryOperation::Update);
/// assert_eq!(error.constraint.as_deref(), Some("ix_employees_email"));
/// assert!(!error.is_retriable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g. "Employee")
    pub entity_type: Option<String>,
    /// The id of the entity involved
    pub entity_id: Option<String>,
    /// Name of the violated unique index or constraint
    pub constraint: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
            constraint: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::GetById,
            RepositoryErrorKind::NotFound,
            "Entity not found",
        )
        .with_entity(entity_type, entity_id)
    }

    /// Create an "already exists" error naming the violated unique index
    pub fn already_exists(entity_type: impl Into<String>, constraint: impl Into<String>) -> Self {
        let constraint = constraint.into();
        Self {
            message: format!("Unique constraint {constraint} violated"),
            constraint: Some(constraint),
            ..Self::new(
                RepositoryOperation::Add,
                RepositoryErrorKind::AlreadyExists,
                String::new(),
            )
        }
        .for_entity(entity_type)
    }

    /// Create a validation failed error
    pub fn validation_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ValidationFailed, message)
    }

    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Add entity type and id to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Add the entity type only
    #[must_use]
    pub fn for_entity(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether a unique index rejected the write
    pub fn is_duplicate(&self) -> bool {
        self.kind == RepositoryErrorKind::AlreadyExists
    }

    /// Check if this error is transient and may succeed on retry
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        match (&self.entity_type, &self.entity_id) {
            (Some(entity_type), Some(entity_id)) => write!(f, " [{}: {}]", entity_type, entity_id)?,
            (Some(entity_type), None) => write!(f, " [{}]", entity_type)?,
            _ => {}
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(feature = "database")]
impl RepositoryError {
    /// Classify an sqlx error raised while running `operation`
    pub fn from_sqlx(operation: RepositoryOperation, err: sqlx::Error) -> Self {
        use sqlx::Error as E;

        match err {
            E::RowNotFound => Self::new(operation, RepositoryErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::timeout(operation, "Timed out acquiring a connection"),
            E::PoolClosed => Self::connection_failed(operation, "Connection pool is closed"),
            E::Io(e) => Self::connection_failed(operation, e.to_string()),
            E::Tls(e) => Self::connection_failed(operation, e.to_string()),
            E::ColumnDecode { index, source } => Self::serialization_error(
                operation,
                format!("Failed to decode column {index}: {source}"),
            ),
            E::Decode(e) => Self::serialization_error(operation, e.to_string()),
            E::Database(db_err) => {
                let constraint = db_err.constraint().map(str::to_string);
                if db_err.is_unique_violation() {
                    Self {
                        constraint,
                        ..Self::new(
                            operation,
                            RepositoryErrorKind::AlreadyExists,
                            db_err.message().to_string(),
                        )
                    }
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    Self {
                        constraint,
                        ..Self::constraint_violation(operation, db_err.message().to_string())
                    }
                } else {
                    Self::database_error(operation, db_err.message().to_string())
                }
            }
            other => Self::database_error(operation, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::GetById), "get_by_id");
        assert_eq!(format!("{}", RepositoryOperation::Find), "find");
        assert_eq!(
            format!("{}", RepositoryOperation::FindWithPagination),
            "find_with_pagination"
        );
        assert_eq!(format!("{}", RepositoryOperation::Add), "add");
        assert_eq!(format!("{}", RepositoryOperation::ExecuteRaw), "execute_raw");
    }

    #[test]
    fn test_repository_error_kind_display() {
        assert_eq!(format!("{}", RepositoryErrorKind::NotFound), "not_found");
        assert_eq!(
            format!("{}", RepositoryErrorKind::AlreadyExists),
            "already_exists"
        );
        assert_eq!(
            format!("{}", RepositoryErrorKind::ValidationFailed),
            "validation_failed"
        );
        assert_eq!(format!("{}", RepositoryErrorKind::Other), "other");
    }

    #[test]
    fn test_not_found_convenience() {
        let error = RepositoryError::not_found("Employee", "123");
        assert_eq!(error.operation, RepositoryOperation::GetById);
        assert_eq!(error.kind, RepositoryErrorKind::NotFound);
        assert_eq!(error.entity_type.as_deref(), Some("Employee"));
        assert_eq!(error.entity_id.as_deref(), Some("123"));
    }

    #[test]
    fn test_already_exists_carries_constraint() {
        let error = RepositoryError::already_exists("Employee", "ix_employees_document");
        assert_eq!(error.operation, RepositoryOperation::Add);
        assert!(error.is_duplicate());
        assert_eq!(error.constraint.as_deref(), Some("ix_employees_document"));
        assert!(error.message.contains("ix_employees_document"));
    }

    #[test]
    fn test_with_operation() {
        let error = RepositoryError::connection_failed(RepositoryOperation::Find, "refused")
            .with_operation(RepositoryOperation::Add);
        assert_eq!(error.operation, RepositoryOperation::Add);
    }

    #[test]
    fn test_is_retriable() {
        assert!(RepositoryError::connection_failed(RepositoryOperation::Find, "x").is_retriable());
        assert!(RepositoryError::timeout(RepositoryOperation::Find, "x").is_retriable());
        assert!(!RepositoryError::not_found("Employee", "1").is_retriable());
        assert!(!RepositoryError::validation_failed(RepositoryOperation::Find, "x").is_retriable());
    }

    #[test]
    fn test_display() {
        let error = RepositoryError::not_found("Employee", "42");
        let display = error.to_string();
        assert!(display.contains("not_found"));
        assert!(display.contains("get_by_id"));
        assert!(display.contains("[Employee: 42]"));

        let error = RepositoryError::validation_failed(
            RepositoryOperation::FindWithPagination,
            "Unknown sort field: salary",
        )
        .for_entity("Employee");
        assert!(error.to_string().ends_with("Unknown sort field: salary [Employee]"));
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_from_sqlx_pool_errors() {
        let error = RepositoryError::from_sqlx(RepositoryOperation::Find, sqlx::Error::PoolTimedOut);
        assert_eq!(error.kind, RepositoryErrorKind::Timeout);

        let error = RepositoryError::from_sqlx(RepositoryOperation::Add, sqlx::Error::PoolClosed);
        assert_eq!(error.kind, RepositoryErrorKind::ConnectionFailed);
        assert_eq!(error.operation, RepositoryOperation::Add);
    }
}
