//! Employee use cases

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::validation::Validator;
use super::{invalid, page_request, paged, recover};
use crate::auth::PasswordHasher;
use crate::context::RequestContext;
use crate::domain::{
    normalize_digits, AuditFields, DataStatus, DomainError, Employee, EmployeeRole, PhoneNumber,
    EMPLOYEE_DOCUMENT_INDEX, EMPLOYEE_EMAIL_INDEX,
};
use crate::error::{Error, Result};
use crate::repository::{
    Filter, FilterCondition, PageRequest, ReadRepository, RepositoryError, WriteRepository,
};
use crate::response::ApiResponse;
use crate::specification::{
    EmployeeDocumentMustBeUnique, EmployeeEmailMustBeUnique, EmployeeMustExist, Specification,
};

/// Sort field applied when a list request names none
pub const DEFAULT_EMPLOYEE_SORT: &str = "firstName";

/// Phone number as submitted by clients
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberRequest {
    /// Id of an existing phone to keep on update
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub number: String,
    #[serde(default, rename = "type")]
    pub phone_type: Option<String>,
}

/// Body of `POST /api/v1/employees`
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub document: String,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<EmployeeRole>,
    pub password: String,
    pub phone_numbers: Vec<PhoneNumberRequest>,
}

/// Body of `PUT /api/v1/employees/{id}`
///
/// Absent or blank fields keep their stored value.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<EmployeeRole>,
    pub password: Option<String>,
    pub phone_numbers: Option<Vec<PhoneNumberRequest>>,
}

/// Query string of `GET /api/v1/employees`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetEmployeesRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    pub start_birth_date: Option<NaiveDate>,
    pub end_birth_date: Option<NaiveDate>,
    pub role: Option<EmployeeRole>,
    pub is_active: Option<bool>,
    /// Page size
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub field_name: Option<String>,
    pub order: Option<String>,
}

impl GetEmployeesRequest {
    /// Live employees matching every supplied criterion
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
            .and_maybe(contains("firstName", &self.first_name))
            .and_maybe(contains("lastName", &self.last_name))
            .and_maybe(contains("email", &self.email))
            .and_maybe(
                self.document
                    .as_deref()
                    .map(normalize_digits)
                    .filter(|d| !d.is_empty())
                    .map(|d| FilterCondition::contains("document", d)),
            )
            .and_maybe(self.start_birth_date.map(|d| FilterCondition::gte("birthDate", d)))
            .and_maybe(self.end_birth_date.map(|d| FilterCondition::lte("birthDate", d)))
            .and_maybe(self.role.map(|r| FilterCondition::eq("role", r.code())))
            .and_maybe(self.is_active.map(|a| FilterCondition::eq("isActive", a)))
    }

    pub fn page_request(&self) -> PageRequest {
        page_request(
            self.page,
            self.offset,
            self.field_name.as_deref(),
            self.order.as_deref(),
            DEFAULT_EMPLOYEE_SORT,
        )
    }
}

/// Create an employee
///
/// Answers 201 with the stored employee. Duplicate email or document answers
/// 400 with the matching error code, whether the duplicate was caught by the
/// uniqueness checks or by the store's unique index.
pub async fn add_employee<R>(
    repo: &R,
    hasher: &PasswordHasher,
    ctx: &RequestContext,
    request: AddEmployeeRequest,
) -> Result<ApiResponse<Employee>>
where
    R: ReadRepository<Employee> + WriteRepository<Employee>,
{
    info!(request_id = %ctx.request_id, email = %request.email, "Adding employee");

    let mut v = Validator::new();
    v.name(&request.first_name, "First name")
        .name(&request.last_name, "Last name")
        .email(&request.email)
        .document(&request.document, "Document")
        .new_password(&request.password, hasher.min_password_length())
        .phone_numbers(request.phone_numbers.iter().map(|p| p.number.as_str()))
        .check(request.role.is_some(), "Role is required");
    match request.birth_date {
        Some(date) => v.birth_date(date),
        None => v.check(false, "Birth date is required"),
    };
    let (role, birth_date) = match (v.finish(), request.role, request.birth_date) {
        (Ok(()), Some(role), Some(birth_date)) => (role, birth_date),
        (result, ..) => return Ok(invalid(result.err().unwrap_or_default())),
    };

    if !ctx.actor.can_assign(role) {
        return recover(role_violation(ctx, role).into());
    }

    let actor = ctx.actor_name();
    let id = Uuid::now_v7();
    let mut employee = Employee {
        id,
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        document: normalize_digits(&request.document),
        birth_date,
        role,
        password_hash: String::new(),
        phone_numbers: request
            .phone_numbers
            .into_iter()
            .map(|p| PhoneNumber::new(id, p.number, p.phone_type, actor))
            .collect(),
        audit: AuditFields::created_by(actor),
    };

    if let Err(err) = check_uniqueness(repo, &employee, None).await {
        return recover(err);
    }

    employee.password_hash = hasher.hash(&request.password)?;
    employee.audit.status = DataStatus::Active;

    match repo.add(&employee).await {
        Ok(true) => {
            info!(request_id = %ctx.request_id, employee_id = %employee.id, "Employee added");
            Ok(ApiResponse::success(employee, StatusCode::CREATED))
        }
        Ok(false) => recover(not_applied("add").into()),
        Err(err) if err.is_duplicate() => duplicate_race(repo, &employee, err).await,
        Err(err) => Err(err.into()),
    }
}

/// Update an employee, merging the supplied fields into the stored record
pub async fn change_employee<R>(
    repo: &R,
    hasher: &PasswordHasher,
    ctx: &RequestContext,
    id: Uuid,
    request: ChangeEmployeeRequest,
) -> Result<ApiResponse<Employee>>
where
    R: ReadRepository<Employee> + WriteRepository<Employee>,
{
    info!(request_id = %ctx.request_id, employee_id = %id, "Changing employee");

    let mut v = Validator::new();
    v.id(id, "Id");
    if let Some(name) = non_blank(&request.first_name) {
        v.name(name, "First name");
    }
    if let Some(name) = non_blank(&request.last_name) {
        v.name(name, "Last name");
    }
    if let Some(email) = non_blank(&request.email) {
        v.email(email);
    }
    if let Some(document) = non_blank(&request.document) {
        v.document(document, "Document");
    }
    if let Some(date) = request.birth_date {
        v.birth_date(date);
    }
    if let Some(phones) = &request.phone_numbers {
        v.phone_numbers(phones.iter().map(|p| p.number.as_str()));
    }
    v.optional_password(request.password.as_deref(), hasher.min_password_length());
    if let Err(errors) = v.finish() {
        return Ok(invalid(errors));
    }

    if let Err(err) = EmployeeMustExist::new(repo).is_satisfied_by(&id).await {
        return recover(err);
    }
    let Some(mut employee) = repo.get_by_id(id).await? else {
        return recover(DomainError::EmployeeNotFound(id).into());
    };

    let actor = ctx.actor_name().to_string();
    if let Some(name) = non_blank(&request.first_name) {
        employee.first_name = name.to_string();
    }
    if let Some(name) = non_blank(&request.last_name) {
        employee.last_name = name.to_string();
    }
    if let Some(email) = non_blank(&request.email) {
        employee.email = email.to_lowercase();
    }
    if let Some(document) = non_blank(&request.document) {
        employee.document = normalize_digits(document);
    }
    if let Some(date) = request.birth_date {
        employee.birth_date = date;
    }
    if let Some(role) = request.role {
        employee.role = role;
    }

    if let Err(err) = check_uniqueness(repo, &employee, Some(id)).await {
        return recover(err);
    }

    if let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) {
        employee.password_hash = hasher.hash(password)?;
    }
    if let Some(phones) = request.phone_numbers {
        employee.phone_numbers = merge_phones(&employee, phones, &actor);
    }

    if !ctx.actor.can_assign(employee.role) {
        return recover(role_violation(ctx, employee.role).into());
    }

    employee.audit.touch(actor);

    match repo.update(&employee).await {
        Ok(true) => {
            info!(request_id = %ctx.request_id, employee_id = %employee.id, "Employee updated");
            Ok(ApiResponse::success(employee, StatusCode::OK))
        }
        Ok(false) => recover(not_applied("update").into()),
        Err(err) if err.is_duplicate() => duplicate_race(repo, &employee, err).await,
        Err(err) => Err(err.into()),
    }
}

/// Soft delete an employee
pub async fn remove_employee<R>(
    repo: &R,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<ApiResponse<bool>>
where
    R: ReadRepository<Employee> + WriteRepository<Employee>,
{
    info!(request_id = %ctx.request_id, employee_id = %id, "Removing employee");

    if let Err(err) = EmployeeMustExist::new(repo).is_satisfied_by(&id).await {
        return recover(err);
    }
    let Some(mut employee) = repo.get_by_id(id).await? else {
        return recover(DomainError::EmployeeNotFound(id).into());
    };

    employee.audit.touch(ctx.actor_name());
    employee.audit.deleted_by = Some(ctx.actor_name().to_string());

    if repo.delete(&employee).await? {
        info!(request_id = %ctx.request_id, employee_id = %id, "Employee removed");
        Ok(ApiResponse::success(true, StatusCode::OK))
    } else {
        recover(not_applied("delete").into())
    }
}

/// Look up one employee by id
///
/// Soft-deleted employees are still returned, flagged with `isDeleted`.
pub async fn get_employee_by_key<R>(
    repo: &R,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<ApiResponse<Employee>>
where
    R: ReadRepository<Employee>,
{
    if id.is_nil() {
        return Ok(invalid(vec!["Id must not be empty".to_string()]));
    }

    match repo.get_by_id(id).await? {
        Some(employee) => Ok(ApiResponse::success(employee, StatusCode::OK)),
        None => {
            warn!(request_id = %ctx.request_id, employee_id = %id, "Employee not found");
            Ok(ApiResponse::not_found(Some("Employee not found".to_string())))
        }
    }
}

/// One page of live employees with pagination metadata
pub async fn get_employees<R>(
    repo: &R,
    ctx: &RequestContext,
    request: GetEmployeesRequest,
) -> Result<ApiResponse<Vec<Employee>>>
where
    R: ReadRepository<Employee>,
{
    let filter = request.filter();
    let page = request.page_request();

    match repo.find_with_pagination(&filter, &page).await {
        Ok((rows, total)) => {
            info!(
                request_id = %ctx.request_id,
                returned = rows.len(),
                total,
                "Employees listed"
            );
            Ok(paged(rows, total, &page))
        }
        Err(err) => recover(err.into()),
    }
}

/// Run the email then the document uniqueness rule
///
/// The rules share one store session, so they never run concurrently.
async fn check_uniqueness<R>(repo: &R, employee: &Employee, exclude_id: Option<Uuid>) -> Result<()>
where
    R: ReadRepository<Employee>,
{
    EmployeeEmailMustBeUnique::new(repo, exclude_id)
        .is_satisfied_by(employee)
        .await?;
    EmployeeDocumentMustBeUnique::new(repo, exclude_id)
        .is_satisfied_by(employee)
        .await?;
    Ok(())
}

/// Answer a unique-index rejection that slipped past the uniqueness rules
///
/// The rules run again so the response names the conflicting employee. When
/// they pass, the conflicting row is no longer visible and the constraint name
/// alone selects the error code.
async fn duplicate_race<R>(
    repo: &R,
    employee: &Employee,
    err: RepositoryError,
) -> Result<ApiResponse<Employee>>
where
    R: ReadRepository<Employee>,
{
    warn!(
        employee_id = %employee.id,
        constraint = ?err.constraint,
        "Unique index rejected a write that passed the uniqueness checks"
    );

    match check_uniqueness(repo, employee, Some(employee.id)).await {
        Err(Error::Domain(e)) => recover(Error::Domain(e)),
        Err(other) => Err(other),
        Ok(()) => {
            let (field, code) = match err.constraint.as_deref() {
                Some(EMPLOYEE_EMAIL_INDEX) => ("email", "EMPLOYEE_EMAIL_ALREADY_EXISTS"),
                Some(EMPLOYEE_DOCUMENT_INDEX) => ("document", "EMPLOYEE_DOCUMENT_ALREADY_EXISTS"),
                _ => return Err(err.into()),
            };
            Ok(
                ApiResponse::error(format!("Employee {field} already exists"), [err.message])
                    .with_status(StatusCode::BAD_REQUEST)
                    .with_code(code),
            )
        }
    }
}

/// Replace the phone list, keeping ids and audit data of phones already owned
fn merge_phones(employee: &Employee, requested: Vec<PhoneNumberRequest>, actor: &str) -> Vec<PhoneNumber> {
    requested
        .into_iter()
        .map(|p| {
            let current = p
                .id
                .and_then(|id| employee.phone_numbers.iter().find(|phone| phone.id == id));
            let mut phone = PhoneNumber::new(employee.id, p.number, p.phone_type, actor);
            if let Some(current) = current {
                phone.id = current.id;
                phone.audit = current.audit.clone();
                phone.audit.touch(actor);
            }
            phone
        })
        .collect()
}

fn role_violation(ctx: &RequestContext, target: EmployeeRole) -> DomainError {
    DomainError::EmployeeRoleHierarchy {
        actor: ctx
            .actor
            .role()
            .map_or_else(|| ctx.actor_name().to_string(), |r| r.to_string()),
        target: target.to_string(),
    }
}

fn not_applied(operation: &str) -> DomainError {
    DomainError::EmployeeOperation {
        operation: operation.to_string(),
        reason: "no rows were affected".to_string(),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
