//! PostgreSQL backend
//!
//! Tables, one row per entity, with the audit columns `created_at`,
//! `created_by`, `updated_at`, `updated_by`, `deleted_at`, `deleted_by`,
//! `is_deleted`, `is_active` and `status` (SMALLINT):
//!
//! - `employees`: unique indexes `ix_employees_email` and `ix_employees_document`
//! - `phone_numbers`: `employee_id` references `employees`
//! - `customers`
//! - `addresses`: one row per customer through `customer_id`
//!
//! Child rows are written in the same transaction as their owner.

mod customer;
mod employee;
mod sql;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub use customer::PgCustomerRepository;
pub use employee::PgEmployeeRepository;

use crate::domain::{AuditFields, DataStatus};
use crate::repository::{RepositoryError, RepositoryOperation, RepositoryResult, Store};

/// Audit columns shared by every table
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AuditColumns {
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
    is_deleted: bool,
    is_active: bool,
    status: i16,
}

/// Column list matching [`AuditColumns`], prefixed for use in SELECTs
pub(crate) const AUDIT_COLUMNS: &str = "created_at, created_by, updated_at, updated_by, \
     deleted_at, deleted_by, is_deleted, is_active, status";

impl From<AuditColumns> for AuditFields {
    fn from(row: AuditColumns) -> Self {
        Self {
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            deleted_at: row.deleted_at,
            deleted_by: row.deleted_by,
            is_deleted: row.is_deleted,
            is_active: row.is_active,
            status: DataStatus::from_code(row.status),
        }
    }
}

/// Store backed by one PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    employees: Arc<PgEmployeeRepository>,
    customers: Arc<PgCustomerRepository>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            employees: Arc::new(PgEmployeeRepository::new(pool.clone())),
            customers: Arc::new(PgCustomerRepository::new(pool.clone())),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for PgStore {
    type Employees = PgEmployeeRepository;
    type Customers = PgCustomerRepository;

    fn employees(&self) -> &Self::Employees {
        &self.employees
    }

    fn customers(&self) -> &Self::Customers {
        &self.customers
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Find, e))
    }
}
