//! Repository trait definitions
//!
//! Generic read and write traits using RPITIT (Return Position Impl Trait In
//! Traits), so implementations write plain `async fn` without `async_trait`.
//!
//! - [`ReadRepository`]: lookup by id, filtered search, paginated search
//! - [`WriteRepository`]: add, update, soft delete, raw statements
//! - [`Store`]: the pair of repositories an application instance runs on
//!
//! # Example
//!
//! ```rust,ignore
//! use employee_management::repository::{Filter, FilterCondition, PageRequest, ReadRepository};
//!
//! let filter = Filter::new().and(FilterCondition::eq("isDeleted", false));
//! let (employees, total) = repo
//!     .find_with_pagination(&filter, &PageRequest::new(1, 20).sorted_by("firstName", Default::default()))
//!     .await?;
//! ```

use std::future::Future;

use chrono::Utc;
use uuid::Uuid;

use super::entity::Entity;
use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Filter, FilterValue, PageRequest};
use crate::domain::{Customer, Employee};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Read side of a repository
///
/// Reads never mutate stored state. Soft-deleted rows are returned like any
/// other row; callers that want only live rows filter on `isDeleted`.
pub trait ReadRepository<E: Entity>: Send + Sync {
    /// Find an entity by id
    ///
    /// Returns `Ok(None)` when no row carries the id.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RepositoryResult<Option<E>>> + Send;

    /// Every entity matching the filter, in insertion order
    fn find(&self, filter: &Filter) -> impl Future<Output = RepositoryResult<Vec<E>>> + Send;

    /// One page of entities matching the filter plus the total match count
    ///
    /// The page request is normalized first. Ordering is ascending unless the
    /// sort direction is descending; ties fall back to insertion order so page
    /// boundaries are deterministic. An unknown sort field fails with
    /// `ValidationFailed`.
    fn find_with_pagination(
        &self,
        filter: &Filter,
        page: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<(Vec<E>, u64)>> + Send;
}

/// Write side of a repository
///
/// Every operation reports whether at least one row was affected.
pub trait WriteRepository<E: Entity>: Send + Sync {
    /// Insert a new entity
    ///
    /// # Errors
    ///
    /// `AlreadyExists` naming the violated index when a unique key collides.
    fn add(&self, entity: &E) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Persist changes to an existing entity
    fn update(&self, entity: &E) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Logically delete an entity
    ///
    /// Marks the audit fields as deleted and persists through [`update`]. A
    /// `deleted_by` already set on the entity is kept.
    ///
    /// [`update`]: WriteRepository::update
    fn delete(&self, entity: &E) -> impl Future<Output = RepositoryResult<bool>> + Send {
        let mut deleted = entity.clone();
        deleted.audit_mut().mark_deleted(Utc::now());
        async move {
            self.update(&deleted)
                .await
                .map_err(|e| e.with_operation(RepositoryOperation::Delete))
        }
    }

    /// Run a raw statement with positional parameters
    fn execute_raw(
        &self,
        sql: &str,
        params: &[FilterValue],
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// The repositories one application instance runs on
pub trait Store: Clone + Send + Sync + 'static {
    type Employees: ReadRepository<Employee> + WriteRepository<Employee>;
    type Customers: ReadRepository<Customer> + WriteRepository<Customer>;

    fn employees(&self) -> &Self::Employees;

    fn customers(&self) -> &Self::Customers;

    /// Name of the backing store, reported by readiness checks
    fn backend(&self) -> &'static str;

    /// Check the store is reachable
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
