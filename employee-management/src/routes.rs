//! HTTP routes
//!
//! Thin adapters from axum extractors to the use-case handlers. List
//! endpoints answer through [`ListResponse`] so rows come back as 206 with
//! `X-Total-Count`, and an empty page as 204.

use axum::{
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    context::RequestContext,
    domain::{Customer, Employee},
    error::Result,
    handlers::{
        self, AddEmployeeRequest, ChangeEmployeeRequest, CustomerRequest, GetCustomersRequest,
        GetEmployeesRequest, LoginRequest, LoginResponse,
    },
    health::{health, readiness},
    middleware::{error_context, ErrorContext, JwtAuth},
    repository::Store,
    response::{ApiResponse, ListResponse},
    state::AppState,
};

/// Build the application router
///
/// Employee routes require a bearer token when `security.require_auth` is
/// set. Login, customers and the probes are open.
///
/// # Errors
///
/// `Error::Config` when authentication is required but no token secret is
/// configured.
pub fn router<S: Store>(state: AppState<S>) -> Result<Router> {
    let config = state.config();

    let mut employees = Router::new()
        .route(
            "/api/v1/employees",
            get(list_employees::<S>).post(create_employee::<S>),
        )
        .route(
            "/api/v1/employees/{id}",
            get(employee_by_id::<S>)
                .put(update_employee::<S>)
                .delete(delete_employee::<S>),
        );
    if config.security.require_auth {
        let auth = JwtAuth::new(&config.security.jwt)?;
        employees = employees.route_layer(from_fn_with_state(auth, JwtAuth::middleware));
    } else {
        tracing::warn!("Employee routes are not protected: security.require_auth is false");
    }

    let open = Router::new()
        .route("/api/v1/auth/login", post(sign_in::<S>))
        .route(
            "/api/v1/customers",
            get(list_customers::<S>).post(create_customer::<S>),
        )
        .route(
            "/api/v1/customers/{id}",
            get(customer_by_id::<S>)
                .put(update_customer::<S>)
                .delete(delete_customer::<S>),
        )
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>));

    let error_ctx = ErrorContext::from_config(config);
    Ok(employees
        .merge(open)
        .layer(from_fn_with_state(error_ctx, error_context))
        .with_state(state))
}

async fn sign_in<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>> {
    handlers::login(
        state.store().employees(),
        state.hasher(),
        state.tokens(),
        &ctx,
        request,
    )
    .await
}

async fn list_employees<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Query(request): Query<GetEmployeesRequest>,
) -> Result<ListResponse<Employee>> {
    handlers::get_employees(state.store().employees(), &ctx, request)
        .await
        .map(ListResponse)
}

async fn employee_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Employee>> {
    handlers::get_employee_by_key(state.store().employees(), &ctx, id).await
}

async fn create_employee<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Json(request): Json<AddEmployeeRequest>,
) -> Result<ApiResponse<Employee>> {
    handlers::add_employee(state.store().employees(), state.hasher(), &ctx, request).await
}

async fn update_employee<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeEmployeeRequest>,
) -> Result<ApiResponse<Employee>> {
    handlers::change_employee(state.store().employees(), state.hasher(), &ctx, id, request).await
}

async fn delete_employee<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<bool>> {
    handlers::remove_employee(state.store().employees(), &ctx, id).await
}

async fn list_customers<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Query(request): Query<GetCustomersRequest>,
) -> Result<ListResponse<Customer>> {
    handlers::get_customers(state.store().customers(), &ctx, request)
        .await
        .map(ListResponse)
}

async fn customer_by_id<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Customer>> {
    handlers::get_customer_by_key(state.store().customers(), &ctx, id).await
}

async fn create_customer<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Json(request): Json<CustomerRequest>,
) -> Result<ApiResponse<Customer>> {
    handlers::add_customer(state.store().customers(), &ctx, request).await
}

async fn update_customer<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CustomerRequest>,
) -> Result<ApiResponse<Customer>> {
    handlers::change_customer(state.store().customers(), &ctx, id, request).await
}

async fn delete_customer<S: Store>(
    State(state): State<AppState<S>>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<bool>> {
    handlers::remove_customer(state.store().customers(), &ctx, id).await
}
