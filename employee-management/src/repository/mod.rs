//! Generic read/write repositories
//!
//! # Features
//!
//! - **Typed queries**: [`Filter`] and [`PageRequest`] replace free-form predicates
//! - **Whitelisted ordering**: sort fields resolve against each [`Entity`]'s field table
//! - **Soft delete**: [`WriteRepository::delete`] marks audit fields and updates
//! - **Backends**: [`InMemoryRepository`] always, PostgreSQL with the `database` feature
//!
//! # Example
//!
//! ```rust
//! use employee_management::domain::Employee;
//! use employee_management::repository::{
//!     Filter, FilterCondition, InMemoryRepository, PageRequest, ReadRepository,
//! };
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let repo = InMemoryRepository::<Employee>::new();
//! let live = Filter::new().and(FilterCondition::eq("isDeleted", false));
//! let (page, total) = repo
//!     .find_with_pagination(&live, &PageRequest::new(1, 20))
//!     .await
//!     .unwrap();
//! assert!(page.is_empty());
//! assert_eq!(total, 0);
//! # });
//! # }
//! ```

mod entity;
mod error;
mod memory;
mod pagination;
mod traits;

#[cfg(feature = "database")]
pub mod postgres;

pub use entity::{Entity, FieldDef, FieldKind, UniqueKey};
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::{InMemoryRepository, InMemoryStore};
pub use pagination::{
    Filter, FilterCondition, FilterOperator, FilterValue, OrderDirection, PageRequest,
    Pagination, SortSpec, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};
pub use traits::{ReadRepository, RepositoryResult, Store, WriteRepository};
