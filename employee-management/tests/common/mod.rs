//! Shared helpers for the integration suites
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use employee_management::auth::PasswordConfig;
use employee_management::config::Config;
use employee_management::domain::{AuditFields, Employee, EmployeeRole, PhoneNumber};
use employee_management::repository::InMemoryStore;
use employee_management::routes::router;
use employee_management::server::Server;
use employee_management::state::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Config with a token secret and cheap password hashing
pub fn config(require_auth: bool) -> Config {
    let mut config = Config::default();
    config.security.jwt.secret = SECRET.to_string();
    config.security.require_auth = require_auth;
    config.security.password = PasswordConfig {
        memory_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
        min_password_length: 8,
    };
    config
}

pub fn state(require_auth: bool) -> AppState<InMemoryStore> {
    AppState::new(config(require_auth), InMemoryStore::new()).unwrap()
}

/// Router wrapped in the production middleware stack
pub fn app(state: AppState<InMemoryStore>) -> Router {
    let server = Server::new(state.config().clone());
    server.with_middleware(router(state).unwrap())
}

/// Status, headers and JSON body (`Null` when the body is empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

pub fn employee_body(email: &str, document: &str) -> Value {
    json!({
        "firstName": "Ana",
        "lastName": "Souza",
        "email": email,
        "document": document,
        "birthDate": "1990-05-17",
        "role": "Analyst",
        "password": "s3cret-pass",
        "phoneNumbers": [
            { "number": "11987654321" },
            { "number": "1133334444", "type": "Home" }
        ]
    })
}

/// Stored employee built without going through the handlers
pub fn employee(first_name: &str, email: &str, document: &str) -> Employee {
    let id = Uuid::now_v7();
    Employee {
        id,
        first_name: first_name.to_string(),
        last_name: "Teste".to_string(),
        email: email.to_string(),
        document: document.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        role: EmployeeRole::Assistant,
        password_hash: String::new(),
        phone_numbers: vec![
            PhoneNumber::new(id, "11987654321", None, "System"),
            PhoneNumber::new(id, "1133334444", None, "System"),
        ],
        audit: AuditFields::default(),
    }
}
