//! Customer use cases

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::validation::Validator;
use super::{invalid, page_request, paged, recover};
use crate::context::RequestContext;
use crate::domain::{normalize_digits, Address, AddressInput, AuditFields, Customer, DataStatus, DomainError};
use crate::error::Result;
use crate::repository::{Filter, FilterCondition, PageRequest, ReadRepository, WriteRepository};
use crate::response::ApiResponse;

/// Sort field applied when a list request names none
pub const DEFAULT_CUSTOMER_SORT: &str = "fullName";

/// Body of `POST /api/v1/customers` and `PUT /api/v1/customers/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerRequest {
    pub full_name: String,
    pub email: String,
    pub document_number: String,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub address: Option<AddressInput>,
    pub favorite_sport: Option<String>,
    pub favorite_club: Option<String>,
    pub accept_terms_use: bool,
    pub accept_privacy_policy: bool,
}

impl CustomerRequest {
    /// Check the request; consent is only demanded when `new` is set
    fn validate(&self, new: bool) -> std::result::Result<NaiveDate, Vec<String>> {
        let mut v = Validator::new();
        v.name(&self.full_name, "Full name")
            .email(&self.email)
            .document(&self.document_number, "Document number")
            .phone(&self.phone, "Phone");
        match self.birth_date {
            Some(date) => v.birth_date(date),
            None => v.check(false, "Birth date is required"),
        };
        if let Some(address) = &self.address {
            v.check(!address.street.trim().is_empty(), "Street is required")
                .check(!address.city.trim().is_empty(), "City is required")
                .zip_code(&address.zip_code);
        }
        if new {
            v.check(self.accept_terms_use, "Terms of use must be accepted")
                .check(
                    self.accept_privacy_policy,
                    "Privacy policy must be accepted",
                );
        }

        match (v.finish(), self.birth_date) {
            (Ok(()), Some(date)) => Ok(date),
            (result, _) => Err(result.err().unwrap_or_default()),
        }
    }
}

/// Query string of `GET /api/v1/customers`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetCustomersRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub document_number: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub start_birth_date: Option<NaiveDate>,
    pub end_birth_date: Option<NaiveDate>,
    pub active: Option<bool>,
    /// Page size
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub field_name: Option<String>,
    pub order: Option<String>,
}

impl GetCustomersRequest {
    /// Live customers matching every supplied criterion
    pub fn filter(&self) -> Filter {
        let contains = |field: &str, value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| FilterCondition::contains(field, v))
        };

        Filter::new()
            .and(FilterCondition::eq("isDeleted", false))
            .and_maybe(contains("fullName", &self.full_name))
            .and_maybe(contains("email", &self.email))
            .and_maybe(
                self.document_number
                    .as_deref()
                    .map(normalize_digits)
                    .filter(|d| !d.is_empty())
                    .map(|d| FilterCondition::contains("documentNumber", d)),
            )
            .and_maybe(
                self.gender
                    .as_deref()
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(|g| FilterCondition::eq("gender", g)),
            )
            .and_maybe(contains("phone", &self.phone))
            .and_maybe(self.start_birth_date.map(|d| FilterCondition::gte("birthDate", d)))
            .and_maybe(self.end_birth_date.map(|d| FilterCondition::lte("birthDate", d)))
            .and_maybe(self.active.map(|a| FilterCondition::eq("isActive", a)))
    }

    pub fn page_request(&self) -> PageRequest {
        page_request(
            self.page,
            self.offset,
            self.field_name.as_deref(),
            self.order.as_deref(),
            DEFAULT_CUSTOMER_SORT,
        )
    }
}

/// Create a customer and its address
pub async fn add_customer<R>(
    repo: &R,
    ctx: &RequestContext,
    request: CustomerRequest,
) -> Result<ApiResponse<Customer>>
where
    R: ReadRepository<Customer> + WriteRepository<Customer>,
{
    info!(request_id = %ctx.request_id, email = %request.email, "Adding customer");

    let birth_date = match request.validate(true) {
        Ok(date) => date,
        Err(errors) => return Ok(invalid(errors)),
    };

    let actor = ctx.actor_name();
    let id = Uuid::now_v7();
    let mut audit = AuditFields::created_by(actor);
    audit.status = DataStatus::Active;
    let customer = Customer {
        id,
        full_name: request.full_name.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        document_number: normalize_digits(&request.document_number),
        gender: request.gender.trim().to_string(),
        birth_date,
        phone: request.phone.trim().to_string(),
        address: request
            .address
            .map(|input| Address::from_input(id, input, actor)),
        favorite_sport: optional(request.favorite_sport),
        favorite_club: optional(request.favorite_club),
        accept_terms_use: request.accept_terms_use,
        accept_privacy_policy: request.accept_privacy_policy,
        audit,
    };

    if repo.add(&customer).await? {
        info!(request_id = %ctx.request_id, customer_id = %customer.id, "Customer added");
        Ok(ApiResponse::success(customer, StatusCode::CREATED))
    } else {
        Ok(ApiResponse::error("Failed to add customer", ["no rows were affected"]))
    }
}

/// Replace a customer's data, keeping its id and creation audit
///
/// A supplied address overwrites the stored one in place, or is created when
/// the customer had none. Leaving the address out keeps the stored one.
pub async fn change_customer<R>(
    repo: &R,
    ctx: &RequestContext,
    id: Uuid,
    request: CustomerRequest,
) -> Result<ApiResponse<Customer>>
where
    R: ReadRepository<Customer> + WriteRepository<Customer>,
{
    info!(request_id = %ctx.request_id, customer_id = %id, "Changing customer");

    let mut v = Validator::new();
    v.id(id, "Id");
    let validated = request.validate(false);
    let birth_date = match (v.finish(), validated) {
        (Ok(()), Ok(date)) => date,
        (id_errors, fields) => {
            let mut errors = id_errors.err().unwrap_or_default();
            errors.extend(fields.err().unwrap_or_default());
            return Ok(invalid(errors));
        }
    };

    let Some(mut customer) = live_customer(repo, id).await? else {
        return recover(DomainError::CustomerNotFound(id).into());
    };

    let actor = ctx.actor_name();
    customer.full_name = request.full_name.trim().to_string();
    customer.email = request.email.trim().to_lowercase();
    customer.document_number = normalize_digits(&request.document_number);
    customer.gender = request.gender.trim().to_string();
    customer.birth_date = birth_date;
    customer.phone = request.phone.trim().to_string();
    customer.favorite_sport = optional(request.favorite_sport);
    customer.favorite_club = optional(request.favorite_club);
    customer.accept_terms_use = request.accept_terms_use;
    customer.accept_privacy_policy = request.accept_privacy_policy;
    if let Some(input) = request.address {
        match customer.address.as_mut() {
            Some(address) => address.apply(input, actor),
            None => customer.address = Some(Address::from_input(id, input, actor)),
        }
    }
    customer.audit.touch(actor);

    if repo.update(&customer).await? {
        info!(request_id = %ctx.request_id, customer_id = %id, "Customer updated");
        Ok(ApiResponse::success(customer, StatusCode::OK))
    } else {
        Ok(ApiResponse::error("Failed to update customer", ["no rows were affected"]))
    }
}

/// Soft delete a customer
pub async fn remove_customer<R>(
    repo: &R,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<ApiResponse<bool>>
where
    R: ReadRepository<Customer> + WriteRepository<Customer>,
{
    info!(request_id = %ctx.request_id, customer_id = %id, "Removing customer");

    let Some(mut customer) = live_customer(repo, id).await? else {
        return recover(DomainError::CustomerNotFound(id).into());
    };

    customer.audit.touch(ctx.actor_name());
    customer.audit.deleted_by = Some(ctx.actor_name().to_string());
    if let Some(address) = customer.address.as_mut() {
        address.audit.touch(ctx.actor_name());
        address.audit.deleted_by = Some(ctx.actor_name().to_string());
        address.audit.mark_deleted(Utc::now());
    }

    if repo.delete(&customer).await? {
        info!(request_id = %ctx.request_id, customer_id = %id, "Customer removed");
        Ok(ApiResponse::success(true, StatusCode::OK))
    } else {
        Ok(ApiResponse::error("Failed to remove customer", ["no rows were affected"]))
    }
}

/// Look up one customer by id
pub async fn get_customer_by_key<R>(
    repo: &R,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<ApiResponse<Customer>>
where
    R: ReadRepository<Customer>,
{
    if id.is_nil() {
        return Ok(invalid(vec!["Id must not be empty".to_string()]));
    }

    match repo.get_by_id(id).await? {
        Some(customer) => Ok(ApiResponse::success(customer, StatusCode::OK)),
        None => {
            warn!(request_id = %ctx.request_id, customer_id = %id, "Customer not found");
            Ok(ApiResponse::not_found(Some("Customer not found".to_string())))
        }
    }
}

/// One page of live customers with pagination metadata
pub async fn get_customers<R>(
    repo: &R,
    ctx: &RequestContext,
    request: GetCustomersRequest,
) -> Result<ApiResponse<Vec<Customer>>>
where
    R: ReadRepository<Customer>,
{
    let filter = request.filter();
    let page = request.page_request();

    match repo.find_with_pagination(&filter, &page).await {
        Ok((rows, total)) => {
            info!(
                request_id = %ctx.request_id,
                returned = rows.len(),
                total,
                "Customers listed"
            );
            Ok(paged(rows, total, &page))
        }
        Err(err) => recover(err.into()),
    }
}

async fn live_customer<R>(repo: &R, id: Uuid) -> Result<Option<Customer>>
where
    R: ReadRepository<Customer>,
{
    if id.is_nil() {
        return Ok(None);
    }
    Ok(repo.get_by_id(id).await?.filter(|c| !c.audit.is_deleted))
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer_fixtures::customer;
    use crate::repository::InMemoryRepository;

    fn address() -> AddressInput {
        AddressInput {
            street: "Rua das Flores".into(),
            number: "100".into(),
            complement: None,
            neighborhood: "Centro".into(),
            city: "Sao Paulo".into(),
            state: "SP".into(),
            country: "Brasil".into(),
            zip_code: "01310-100".into(),
        }
    }

    fn request() -> CustomerRequest {
        CustomerRequest {
            full_name: "Maria Silva".into(),
            email: "Maria@Example.com".into(),
            document_number: "529.982.247-25".into(),
            gender: "F".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 2),
            phone: "(11) 98765-4321".into(),
            address: Some(address()),
            favorite_sport: Some(" ".into()),
            favorite_club: Some("Santos".into()),
            accept_terms_use: true,
            accept_privacy_policy: true,
        }
    }

    #[tokio::test]
    async fn test_add_customer_with_address() {
        let repo = InMemoryRepository::new();
        let ctx = RequestContext::system();

        let response = add_customer(&repo, &ctx, request()).await.unwrap();
        assert_eq!(response.status_code, 201);

        let created = response.into_payload().unwrap();
        assert_eq!(created.email, "maria@example.com");
        assert_eq!(created.document_number, "52998224725");
        assert_eq!(created.favorite_sport, None);
        let address = created.address.as_ref().unwrap();
        assert_eq!(address.customer_id, created.id);

        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_customer_requires_consent_and_zip() {
        let repo: InMemoryRepository<Customer> = InMemoryRepository::new();
        let mut body = request();
        body.accept_terms_use = false;
        body.address = Some(AddressInput {
            zip_code: "123".into(),
            ..address()
        });

        let response = add_customer(&repo, &RequestContext::system(), body).await.unwrap();
        assert_eq!(response.status_code, 400);
        let detail = response.error.unwrap().detail;
        assert!(detail.contains("Terms of use must be accepted"));
        assert!(detail.contains("Zip code must have 8 digits"));
    }

    #[tokio::test]
    async fn test_change_customer_keeps_address_id() {
        let repo = InMemoryRepository::new();
        let ctx = RequestContext::system();
        let created = add_customer(&repo, &ctx, request())
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        let address_id = created.address.as_ref().unwrap().id;

        let mut body = request();
        body.full_name = "Maria Souza".into();
        body.address = Some(AddressInput {
            city: "Campinas".into(),
            ..address()
        });
        let response = change_customer(&repo, &ctx, created.id, body).await.unwrap();
        assert_eq!(response.status_code, 200);

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Maria Souza");
        assert_eq!(stored.audit.created_at, created.audit.created_at);
        let address = stored.address.unwrap();
        assert_eq!(address.id, address_id);
        assert_eq!(address.city, "Campinas");
    }

    #[tokio::test]
    async fn test_remove_customer_is_soft() {
        let repo = InMemoryRepository::new();
        let existing = customer("Maria Silva", "maria@example.com");
        repo.add(&existing).await.unwrap();
        let ctx = RequestContext::system();

        let response = remove_customer(&repo, &ctx, existing.id).await.unwrap();
        assert_eq!(response.payload(), Some(&true));

        let stored = repo.get_by_id(existing.id).await.unwrap().unwrap();
        assert!(stored.audit.is_deleted);

        let listed = get_customers(&repo, &ctx, GetCustomersRequest::default())
            .await
            .unwrap();
        assert!(listed.payload().unwrap().is_empty());

        let again = remove_customer(&repo, &ctx, existing.id).await.unwrap();
        assert_eq!(again.error_code(), Some("CUSTOMER_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_remove_customer_deletes_address_too() {
        let repo = InMemoryRepository::new();
        let created = add_customer(&repo, &RequestContext::system(), request())
            .await
            .unwrap()
            .into_payload()
            .unwrap();
        let ctx = RequestContext::system().with_actor(crate::context::Actor::Employee {
            email: "boss@x.com".into(),
            role: None,
        });

        remove_customer(&repo, &ctx, created.id).await.unwrap();

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        let address = stored.address.unwrap();
        assert!(address.audit.is_deleted);
        assert!(address.audit.deleted_at.is_some());
        assert_eq!(address.audit.status, DataStatus::Deleted);
        assert_eq!(address.audit.deleted_by.as_deref(), Some("boss@x.com"));
        assert_eq!(stored.audit.deleted_by.as_deref(), Some("boss@x.com"));
    }

    #[tokio::test]
    async fn test_get_customers_sorted_desc() {
        let repo = InMemoryRepository::new();
        for name in ["Ana Lima", "Carla Dias", "Bia Rocha"] {
            repo.add(&customer(name, "x@example.com")).await.unwrap();
        }

        let request = GetCustomersRequest {
            order: Some("DESC".into()),
            offset: Some(2),
            ..Default::default()
        };
        let response = get_customers(&repo, &RequestContext::system(), request)
            .await
            .unwrap();

        let metadata = response.metadata.unwrap();
        assert_eq!(metadata.total_items, 3);
        assert_eq!(metadata.total_pages, 2);
        let names: Vec<String> = response
            .into_payload()
            .unwrap()
            .into_iter()
            .map(|c| c.full_name)
            .collect();
        assert_eq!(names, vec!["Carla Dias", "Bia Rocha"]);
    }
}
