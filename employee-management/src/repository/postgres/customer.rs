//! Customers and their addresses

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::sql::{bind_params, ensure_statement, push_filter, push_order, push_page};
use super::{AuditColumns, AUDIT_COLUMNS};
use crate::domain::{Address, Customer};
use crate::repository::{
    Entity, Filter, FilterValue, PageRequest, ReadRepository, RepositoryError,
    RepositoryOperation, RepositoryResult, WriteRepository,
};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    full_name: String,
    email: String,
    document_number: String,
    gender: String,
    birth_date: NaiveDate,
    phone: String,
    favorite_sport: Option<String>,
    favorite_club: Option<String>,
    accept_terms_use: bool,
    accept_privacy_policy: bool,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl CustomerRow {
    fn into_customer(self, address: Option<Address>) -> Customer {
        Customer {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            document_number: self.document_number,
            gender: self.gender,
            birth_date: self.birth_date,
            phone: self.phone,
            address,
            favorite_sport: self.favorite_sport,
            favorite_club: self.favorite_club,
            accept_terms_use: self.accept_terms_use,
            accept_privacy_policy: self.accept_privacy_policy,
            audit: self.audit.into(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: Uuid,
    customer_id: Uuid,
    street: String,
    number: String,
    complement: Option<String>,
    neighborhood: String,
    city: String,
    state: String,
    country: String,
    zip_code: String,
    #[sqlx(flatten)]
    audit: AuditColumns,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            street: row.street,
            number: row.number,
            complement: row.complement,
            neighborhood: row.neighborhood,
            city: row.city,
            state: row.state,
            country: row.country,
            zip_code: row.zip_code,
            audit: row.audit.into(),
        }
    }
}

fn select_customers() -> String {
    format!(
        "SELECT id, full_name, email, document_number, gender, birth_date, phone, favorite_sport, \
         favorite_club, accept_terms_use, accept_privacy_policy, {} FROM customers",
        AUDIT_COLUMNS
    )
}

/// Customer repository over `customers` and `addresses`
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(
        &self,
        rows: Vec<CustomerRow>,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Vec<Customer>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let addresses: Vec<AddressRow> = sqlx::query_as(&format!(
            "SELECT id, customer_id, street, number, complement, neighborhood, city, state, \
             country, zip_code, {} FROM addresses WHERE customer_id = ANY($1)",
            AUDIT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(operation, e).for_entity("Address"))?;

        let mut by_owner: HashMap<Uuid, Address> = addresses
            .into_iter()
            .map(|row| (row.customer_id, Address::from(row)))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let address = by_owner.remove(&row.id);
                row.into_customer(address)
            })
            .collect())
    }

    async fn write_address(
        tx: &mut Transaction<'_, Postgres>,
        customer: &Customer,
        operation: RepositoryOperation,
    ) -> RepositoryResult<()> {
        let Some(address) = &customer.address else {
            return Ok(());
        };

        sqlx::query(
            "INSERT INTO addresses (id, customer_id, street, number, complement, neighborhood, \
             city, state, country, zip_code, created_at, created_by, updated_at, updated_by, \
             deleted_at, deleted_by, is_deleted, is_active, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             ON CONFLICT (id) DO UPDATE SET street = EXCLUDED.street, number = EXCLUDED.number, \
             complement = EXCLUDED.complement, neighborhood = EXCLUDED.neighborhood, \
             city = EXCLUDED.city, state = EXCLUDED.state, country = EXCLUDED.country, \
             zip_code = EXCLUDED.zip_code, updated_at = EXCLUDED.updated_at, \
             updated_by = EXCLUDED.updated_by, deleted_at = EXCLUDED.deleted_at, \
             deleted_by = EXCLUDED.deleted_by, is_deleted = EXCLUDED.is_deleted, \
             is_active = EXCLUDED.is_active, status = EXCLUDED.status",
        )
        .bind(address.id)
        .bind(customer.id)
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.country)
        .bind(&address.zip_code)
        .bind(address.audit.created_at)
        .bind(&address.audit.created_by)
        .bind(address.audit.updated_at)
        .bind(&address.audit.updated_by)
        .bind(address.audit.deleted_at)
        .bind(&address.audit.deleted_by)
        .bind(address.audit.is_deleted)
        .bind(address.audit.is_active)
        .bind(address.audit.status.code())
        .execute(&mut **tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(operation, e).for_entity("Address"))?;
        Ok(())
    }

    fn error(operation: RepositoryOperation, customer_id: Uuid, err: sqlx::Error) -> RepositoryError {
        RepositoryError::from_sqlx(operation, err)
            .with_entity(Customer::ENTITY_NAME, customer_id.to_string())
    }
}

impl ReadRepository<Customer> for PgCustomerRepository {
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", select_customers()))
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

    async fn find(&self, filter: &Filter) -> RepositoryResult<Vec<Customer>> {
        let mut qb = QueryBuilder::<Postgres>::new(select_customers());
        push_filter::<Customer>(&mut qb, filter, RepositoryOperation::Find)?;
        push_order::<Customer>(&mut qb, &PageRequest::default())?;

        let rows: Vec<CustomerRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::Find, e)
                    .for_entity(Customer::ENTITY_NAME)
            })?;

        self.hydrate(rows, RepositoryOperation::Find).await
    }

    async fn find_with_pagination(
        &self,
        filter: &Filter,
        page: &PageRequest,
    ) -> RepositoryResult<(Vec<Customer>, u64)> {
        let operation = RepositoryOperation::FindWithPagination;
        let page = page.normalized();

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM customers");
        push_filter::<Customer>(&mut count_qb, filter, operation)?;

        let mut data_qb = QueryBuilder::<Postgres>::new(select_customers());
        push_filter::<Customer>(&mut data_qb, filter, operation)?;
        push_order::<Customer>(&mut data_qb, &page)?;
        push_page(&mut data_qb, &page);

        let (total, rows) = futures::try_join!(
            count_qb.build_query_scalar::<i64>().fetch_one(&self.pool),
            data_qb.build_query_as::<CustomerRow>().fetch_all(&self.pool),
        )
        .map_err(|e| RepositoryError::from_sqlx(operation, e).for_entity(Customer::ENTITY_NAME))?;

        let items = self.hydrate(rows, operation).await?;
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }
}

impl WriteRepository<Customer> for PgCustomerRepository {
    async fn add(&self, entity: &Customer) -> RepositoryResult<bool> {
        let operation = RepositoryOperation::Add;
        let error = |e| Self::error(operation, entity.id, e);

        let mut tx = self.pool.begin().await.map_err(error)?;
        let result = sqlx::query(
            "INSERT INTO customers (id, full_name, email, document_number, gender, birth_date, \
             phone, favorite_sport, favorite_club, accept_terms_use, accept_privacy_policy, \
             created_at, created_by, updated_at, updated_by, deleted_at, deleted_by, is_deleted, \
             is_active, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)",
        )
        .bind(entity.id)
        .bind(&entity.full_name)
        .bind(&entity.email)
        .bind(&entity.document_number)
        .bind(&entity.gender)
        .bind(entity.birth_date)
        .bind(&entity.phone)
        .bind(&entity.favorite_sport)
        .bind(&entity.favorite_club)
        .bind(entity.accept_terms_use)
        .bind(entity.accept_privacy_policy)
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

        Self::write_address(&mut tx, entity, operation).await?;
        tx.commit().await.map_err(error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, entity: &Customer) -> RepositoryResult<bool> {
        let operation = RepositoryOperation::Update;
        let error = |e| Self::error(operation, entity.id, e);

        let mut tx = self.pool.begin().await.map_err(error)?;
        let result = sqlx::query(
            "UPDATE customers SET full_name = $2, email = $3, document_number = $4, gender = $5, \
             birth_date = $6, phone = $7, favorite_sport = $8, favorite_club = $9, \
             accept_terms_use = $10, accept_privacy_policy = $11, updated_at = $12, \
             updated_by = $13, deleted_at = $14, deleted_by = $15, is_deleted = $16, \
             is_active = $17, status = $18 WHERE id = $1",
        )
        .bind(entity.id)
        .bind(&entity.full_name)
        .bind(&entity.email)
        .bind(&entity.document_number)
        .bind(&entity.gender)
        .bind(entity.birth_date)
        .bind(&entity.phone)
        .bind(&entity.favorite_sport)
        .bind(&entity.favorite_club)
        .bind(entity.accept_terms_use)
        .bind(entity.accept_privacy_policy)
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
            return Ok(false);
        }

        Self::write_address(&mut tx, entity, operation).await?;
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
                    .for_entity(Customer::ENTITY_NAME)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
