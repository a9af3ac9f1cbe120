//! In-memory repository backend
//!
//! Rows live in insertion order behind a tokio `RwLock`. Unique indexes are
//! emulated through [`Entity::unique_keys`], so duplicate races surface as the
//! same `AlreadyExists` error the PostgreSQL backend produces.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::entity::{Entity, FieldKind};
use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Filter, FilterValue, OrderDirection, PageRequest};
use super::traits::{ReadRepository, RepositoryResult, Store, WriteRepository};
use crate::domain::{Customer, Employee};

/// Generic repository over a vector of entities
pub struct InMemoryRepository<E> {
    rows: RwLock<Vec<E>>,
    offline: AtomicBool,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate an unreachable store; every call fails with `ConnectionFailed`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of stored rows, including soft-deleted ones
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn ensure_online(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(
                RepositoryError::connection_failed(operation, "In-memory store is offline")
                    .for_entity(E::ENTITY_NAME),
            );
        }
        Ok(())
    }

    fn check_unique(
        rows: &[E],
        candidate: &E,
        operation: RepositoryOperation,
    ) -> RepositoryResult<()> {
        let keys = candidate.unique_keys();
        let clash = rows
            .iter()
            .filter(|row| row.id() != candidate.id())
            .flat_map(|row| row.unique_keys())
            .find(|key| !key.value.is_empty() && keys.contains(key));

        match clash {
            Some(key) => Err(RepositoryError::already_exists(E::ENTITY_NAME, key.constraint)
                .with_operation(operation)),
            None => Ok(()),
        }
    }
}

/// Ordering used for sorting; text compares case-insensitively
fn sort_cmp(kind: FieldKind, a: &FilterValue, b: &FilterValue) -> Ordering {
    match (kind, a, b) {
        (FieldKind::Text, FilterValue::String(a), FilterValue::String(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        _ => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

impl<E: Entity> ReadRepository<E> for InMemoryRepository<E> {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<E>> {
        self.ensure_online(RepositoryOperation::GetById)?;
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn find(&self, filter: &Filter) -> RepositoryResult<Vec<E>> {
        self.ensure_online(RepositoryOperation::Find)?;
        filter.validate::<E>(RepositoryOperation::Find)?;
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| filter.matches(*row)).cloned().collect())
    }

    async fn find_with_pagination(
        &self,
        filter: &Filter,
        page: &PageRequest,
    ) -> RepositoryResult<(Vec<E>, u64)> {
        self.ensure_online(RepositoryOperation::FindWithPagination)?;
        filter.validate::<E>(RepositoryOperation::FindWithPagination)?;
        let page = page.normalized();
        let sort_field = page.sort.as_ref().map(E::sort_field).transpose()?;

        let rows = self.rows.read().await;
        let mut matched: Vec<&E> = rows.iter().filter(|row| filter.matches(*row)).collect();
        let total = matched.len() as u64;

        // stable sort: ties fall back to created_at, then insertion order
        matched.sort_by(|a, b| {
            let ordering = match (sort_field, page.sort.as_ref()) {
                (Some(def), Some(sort)) => {
                    let ordering = sort_cmp(
                        def.kind,
                        &a.field_value(def.column),
                        &b.field_value(def.column),
                    );
                    match sort.direction {
                        OrderDirection::Ascending => ordering,
                        OrderDirection::Descending => ordering.reverse(),
                    }
                }
                _ => Ordering::Equal,
            };
            ordering.then_with(|| a.audit().created_at.cmp(&b.audit().created_at))
        });

        let window = page.pagination();
        let items = matched
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((items, total))
    }
}

impl<E: Entity> WriteRepository<E> for InMemoryRepository<E> {
    async fn add(&self, entity: &E) -> RepositoryResult<bool> {
        self.ensure_online(RepositoryOperation::Add)?;
        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(RepositoryError::already_exists(
                E::ENTITY_NAME,
                format!("pk_{}", E::ENTITY_NAME.to_lowercase()),
            ));
        }
        Self::check_unique(&rows, entity, RepositoryOperation::Add)?;

        rows.push(entity.clone());
        Ok(true)
    }

    async fn update(&self, entity: &E) -> RepositoryResult<bool> {
        self.ensure_online(RepositoryOperation::Update)?;
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, entity, RepositoryOperation::Update)?;

        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn execute_raw(&self, sql: &str, _params: &[FilterValue]) -> RepositoryResult<bool> {
        self.ensure_online(RepositoryOperation::ExecuteRaw)?;
        if sql.trim().is_empty() {
            return Err(RepositoryError::validation_failed(
                RepositoryOperation::ExecuteRaw,
                "SQL statement must not be empty",
            ));
        }
        Err(RepositoryError::validation_failed(
            RepositoryOperation::ExecuteRaw,
            "Raw SQL is not supported by the in-memory store",
        )
        .for_entity(E::ENTITY_NAME))
    }
}

/// Store backed by in-memory repositories
#[derive(Clone, Default)]
pub struct InMemoryStore {
    employees: Arc<InMemoryRepository<Employee>>,
    customers: Arc<InMemoryRepository<Customer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failure injection on both repositories
    pub fn set_offline(&self, offline: bool) {
        self.employees.set_offline(offline);
        self.customers.set_offline(offline);
    }
}

impl Store for InMemoryStore {
    type Employees = InMemoryRepository<Employee>;
    type Customers = InMemoryRepository<Customer>;

    fn employees(&self) -> &Self::Employees {
        &self.employees
    }

    fn customers(&self) -> &Self::Customers {
        &self.customers
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.employees.ensure_online(RepositoryOperation::Count)
    }
}
