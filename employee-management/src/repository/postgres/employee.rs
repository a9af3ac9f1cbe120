//! Employees and their phone numbers

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::sql::{bind_params, ensure_statement, push_filter, push_order, push_page};
use super::{AuditColumns, AUDIT_COLUMNS};
use crate::domain::{Employee, EmployeeRole, PhoneNumber};
use crate::repository::{
    Entity, Filter, FilterValue, PageRequest, ReadRepository, RepositoryError,
    RepositoryOperation, RepositoryResult, WriteRepository,
};

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    document: String,
    birth_date: NaiveDate,
    role: i16,
    password_hash: String,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

#[derive(sqlx::FromRow)]
struct PhoneRow {
    id: Uuid,
    employee_id: Uuid,
    number: String,
    #[sqlx(rename = "type")]
    phone_type: String,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl From<PhoneRow> for PhoneNumber {
    fn from(row: PhoneRow) -> Self {
        Self {
            id: row.id,
            employee_id: row.employee_id,
            number: row.number,
            phone_type: row.phone_type,
            audit: row.audit.into(),
        }
    }
}

impl EmployeeRow {
    fn into_employee(self, phone_numbers: Vec<PhoneNumber>) -> RepositoryResult<Employee> {
        let role = EmployeeRole::from_code(self.role).ok_or_else(|| {
            RepositoryError::serialization_error(
                RepositoryOperation::Find,
                format!("Unknown role code {}", self.role),
            )
            .with_entity(Employee::ENTITY_NAME, self.id.to_string())
        })?;

        Ok(Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            document: self.document,
            birth_date: self.birth_date,
            role,
            password_hash: self.password_hash,
            phone_numbers,
            audit: self.audit.into(),
        })
    }
}

fn select_employees() -> String {
    format!(
        "SELECT id, first_name, last_name, email, document, birth_date, role, password_hash, {} \
         FROM employees",
        AUDIT_COLUMNS
    )
}

/// Employee repository over `employees` and `phone_numbers`
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach live phone numbers to each row, preserving row order
    async fn hydrate(
        &self,
        rows: Vec<EmployeeRow>,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Vec<Employee>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let phones: Vec<PhoneRow> = sqlx::query_as(&format!(
            "SELECT id, employee_id, number, type, {} FROM phone_numbers \
             WHERE employee_id = ANY($1) AND is_deleted = FALSE \
             ORDER BY created_at ASC, id ASC",
            AUDIT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(operation, e).for_entity(Employee::ENTITY_NAME))?;

        let mut by_owner: HashMap<Uuid, Vec<PhoneNumber>> = HashMap::new();
        for phone in phones {
            by_owner
                .entry(phone.employee_id)
                .or_default()
                .push(phone.into());
        }

        rows.into_iter()
            .map(|row| {
                let phones = by_owner.remove(&row.id).unwrap_or_default();
                row.into_employee(phones)
                    .map_err(|e| e.with_operation(operation))
            })
            .collect()
    }

    async fn write_phones(
        tx: &mut Transaction<'_, Postgres>,
        employee: &Employee,
        operation: RepositoryOperation,
    ) -> RepositoryResult<()> {
        let keep: Vec<Uuid> = employee.phone_numbers.iter().map(|p| p.id).collect();
        let actor = employee
            .audit
            .updated_by
            .clone()
            .unwrap_or_else(|| employee.audit.created_by.clone());

        // phones dropped from the list are soft-deleted
        sqlx::query(
            "UPDATE phone_numbers SET is_deleted = TRUE, deleted_at = NOW(), deleted_by = $3, \
             status = 3 WHERE employee_id = $1 AND NOT (id = ANY($2)) AND is_deleted = FALSE",
        )
        .bind(employee.id)
        .bind(&keep)
        .bind(&actor)
        .execute(&mut **tx)
        .await
        .map_err(|e| phone_error(operation, e))?;

        for phone in &employee.phone_numbers {
            sqlx::query(
                "INSERT INTO phone_numbers (id, employee_id, number, type, created_at, created_by, \
                 updated_at, updated_by, deleted_at, deleted_by, is_deleted, is_active, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
                 ON CONFLICT (id) DO UPDATE SET number = EXCLUDED.number, type = EXCLUDED.type, \
                 updated_at = EXCLUDED.updated_at, updated_by = EXCLUDED.updated_by, \
                 is_active = EXCLUDED.is_active, status = EXCLUDED.status",
            )
            .bind(phone.id)
            .bind(employee.id)
            .bind(&phone.number)
            .bind(&phone.phone_type)
            .bind(phone.audit.created_at)
            .bind(&phone.audit.created_by)
            .bind(phone.audit.updated_at)
            .bind(&phone.audit.updated_by)
            .bind(phone.audit.deleted_at)
            .bind(&phone.audit.deleted_by)
            .bind(phone.audit.is_deleted)
            .bind(phone.audit.is_active)
            .bind(phone.audit.status.code())
            .execute(&mut **tx)
            .await
            .map_err(|e| phone_error(operation, e))?;
        }
        Ok(())
    }

    fn error(operation: RepositoryOperation, employee_id: Uuid, err: sqlx::Error) -> RepositoryError {
        RepositoryError::from_sqlx(operation, err)
            .with_entity(Employee::ENTITY_NAME, employee_id.to_string())
    }
}

fn phone_error(operation: RepositoryOperation, err: sqlx::Error) -> RepositoryError {
    RepositoryError::from_sqlx(operation, err).for_entity("PhoneNumber")
}

impl ReadRepository<Employee> for PgEmployeeRepository {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Employee>> {
        let row: Option<EmployeeRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", select_employees()))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Self::error(RepositoryOperation::GetById, id, e))?;

        match row {
            Some(row) => Ok(self
                .hydrate(vec![row], RepositoryOperation::GetById)
                .await?
                .pop()),
            None => Ok(None),
        }
    }

    async fn find(&self, filter: &Filter) -> RepositoryResult<Vec<Employee>> {
        let mut qb = QueryBuilder::<Postgres>::new(select_employees());
        push_filter::<Employee>(&mut qb, filter, RepositoryOperation::Find)?;
        push_order::<Employee>(&mut qb, &PageRequest::default())?;

        let rows: Vec<EmployeeRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::Find, e)
                    .for_entity(Employee::ENTITY_NAME)
            })?;

        self.hydrate(rows, RepositoryOperation::Find).await
    }

    async fn find_with_pagination(
        &self,
        filter: &Filter,
        page: &PageRequest,
    ) -> RepositoryResult<(Vec<Employee>, u64)> {
        let operation = RepositoryOperation::FindWithPagination;
        let page = page.normalized();

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        push_filter::<Employee>(&mut count_qb, filter, operation)?;

        let mut data_qb = QueryBuilder::<Postgres>::new(select_employees());
        push_filter::<Employee>(&mut data_qb, filter, operation)?;
        push_order::<Employee>(&mut data_qb, &page)?;
        push_page(&mut data_qb, &page);

        // separate pool connections, so the two queries may overlap
        let (total, rows): (i64, Vec<EmployeeRow>) = futures::try_join!(
            count_qb.build_query_scalar::<i64>().fetch_one(&self.pool),
            data_qb.build_query_as::<EmployeeRow>().fetch_all(&self.pool),
        )
        .map_err(|e| RepositoryError::from_sqlx(operation, e).for_entity(Employee::ENTITY_NAME))?;

        let items = self.hydrate(rows, operation).await?;
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }
}

impl WriteRepository<Employee> for PgEmployeeRepository {
    async fn add(&self, entity: &Employee) -> RepositoryResult<bool> {
        let operation = RepositoryOperation::Add;
        let error = |e| Self::error(operation, entity.id, e);

        let mut tx = self.pool.begin().await.map_err(error)?;
        let result = sqlx::query(
            "INSERT INTO employees (id, first_name, last_name, email, document, birth_date, role, \
             password_hash, created_at, created_by, updated_at, updated_by, deleted_at, deleted_by, \
             is_deleted, is_active, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(entity.id)
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.email)
        .bind(&entity.document)
        .bind(entity.birth_date)
        .bind(entity.role.code())
        .bind(&entity.password_hash)
        .bind(entity.audit.created_at)
        .bind(&entity.audit.created_by)
        .bind(entity.audit.updated_at)
        .bind(&entity.audit.updated_by)
        .bind(entity.audit.deleted_at)
        .bind(&entity.audit.deleted_by)
        .bind(entity.audit.is_deleted)
        .bind(entity.audit.is_active)
        .bind(entity.audit.status.code())
        .execute(&mut *tx)
        .await
        .map_err(error)?;

        Self::write_phones(&mut tx, entity, operation).await?;
        tx.commit().await.map_err(error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, entity: &Employee) -> RepositoryResult<bool> {
        let operation = RepositoryOperation::Update;
        let error = |e| Self::error(operation, entity.id, e);

        let mut tx = self.pool.begin().await.map_err(error)?;
        let result = sqlx::query(
            "UPDATE employees SET first_name = $2, last_name = $3, email = $4, document = $5, \
             birth_date = $6, role = $7, password_hash = $8, updated_at = $9, updated_by = $10, \
             deleted_at = $11, deleted_by = $12, is_deleted = $13, is_active = $14, status = $15 \
             WHERE id = $1",
        )
        .bind(entity.id)
        .bind(&entity.first_name)
        .bind(&entity.last_name)
        .bind(&entity.email)
        .bind(&entity.document)
        .bind(entity.birth_date)
        .bind(entity.role.code())
        .bind(&entity.password_hash)
        .bind(entity.audit.updated_at)
        .bind(&entity.audit.updated_by)
        .bind(entity.audit.deleted_at)
        .bind(&entity.audit.deleted_by)
        .bind(entity.audit.is_deleted)
        .bind(entity.audit.is_active)
        .bind(entity.audit.status.code())
        .execute(&mut *tx)
        .await
        .map_err(error)?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Ok(false);
        }

        Self::write_phones(&mut tx, entity, operation).await?;
        tx.commit().await.map_err(error)?;
        Ok(true)
    }

    async fn execute_raw(&self, sql: &str, params: &[FilterValue]) -> RepositoryResult<bool> {
        ensure_statement(sql)?;
        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::ExecuteRaw, e)
                    .for_entity(Employee::ENTITY_NAME)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
