//! # employee-management
//!
//! Employee and customer management API: authentication, paginated search,
//! and create/update/soft-delete over a relational store.
//!
//! ## Features
//!
//! - **Typed queries**: whitelisted filter and sort fields, normalized paging
//! - **Specifications**: email/document uniqueness and existence checks before writes
//! - **Uniform envelope**: every handler answers with [`response::ApiResponse`]
//! - **Storage**: PostgreSQL (`database` feature) or an in-memory store
//! - **Auth**: Argon2id password hashes and HS256 bearer tokens
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use employee_management::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::new(config.clone(), InMemoryStore::new())?;
//!     let app = router(state)?;
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod response;
pub mod routes;
pub mod seed;
pub mod server;
pub mod specification;
pub mod state;

#[cfg(feature = "database")]
pub mod database;

pub mod prelude {
    pub use crate::auth::{JwtGenerator, PasswordHasher, TokenGenerator};
    pub use crate::config::Config;
    pub use crate::context::{Actor, RequestContext};
    pub use crate::domain::{Customer, DomainError, Employee, EmployeeRole};
    pub use crate::error::{Error, Result};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{MakeTypedRequestId, RequestId};
    pub use crate::middleware::{Claims, JwtAuth, TokenValidator};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        Filter, FilterCondition, InMemoryStore, PageRequest, ReadRepository, Store,
        WriteRepository,
    };
    pub use crate::response::{ApiResponse, ListResponse};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;

    #[cfg(feature = "database")]
    pub use crate::database::create_pool;
    #[cfg(feature = "database")]
    pub use crate::repository::postgres::PgStore;

    pub use axum::{
        extract::{Path, Query, State},
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tokio;
    pub use tracing::{debug, error, info, warn};
}
