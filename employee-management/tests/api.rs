//! End-to-end scenarios through the axum router

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{app, employee_body, send, state};
use employee_management::repository::{ReadRepository, Store};
use employee_management::seed;

async fn create(app: &axum::Router, body: Value, token: Option<&str>) -> (StatusCode, Value) {
    let (status, _, json) = send(app, Method::POST, "/api/v1/employees", Some(body), token).await;
    (status, json)
}

#[tokio::test]
async fn duplicate_document_in_other_format_is_a_conflict() {
    let app = app(state(false));

    let (status, body) = create(&app, employee_body("a@x.com", "12345678909"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 201);
    let id = body["data"]["response"]["id"].as_str().unwrap().to_string();
    assert!(body["data"]["response"].get("passwordHash").is_none());

    let (status, body) = create(&app, employee_body("b@x.com", "123.456.789-09"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "EMPLOYEE_DOCUMENT_ALREADY_EXISTS");
    assert!(body["error"]["message"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn email_change_conflicts_with_other_owner_but_not_self() {
    let app = app(state(false));

    let (_, a) = create(&app, employee_body("a@x.com", "12345678909"), None).await;
    let (_, b) = create(&app, employee_body("b@x.com", "52998224725"), None).await;
    let a_id = a["data"]["response"]["id"].as_str().unwrap();
    assert_eq!(b["statusCode"], 201);

    let uri = format!("/api/v1/employees/{a_id}");
    let (status, _, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "b@x.com" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPLOYEE_EMAIL_ALREADY_EXISTS");

    let (status, _, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "email": "a@x.com", "firstName": "Amanda" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["response"]["firstName"], "Amanda");
}

#[tokio::test]
async fn validation_failures_join_messages() {
    let app = app(state(false));

    let (status, body) = create(&app, json!({ "email": "nope" }), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Validation failed");
    let detail = body["error"]["detail"].as_str().unwrap();
    assert!(detail.contains("Email is not valid"));
    assert!(detail.contains("; "));
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn lists_answer_partial_content_or_no_content() {
    let app = app(state(false));

    let (status, _, body) = send(&app, Method::GET, "/api/v1/employees", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    for (email, doc) in [
        ("a@x.com", "12345678909"),
        ("b@x.com", "52998224725"),
        ("c@x.com", "11144477735"),
    ] {
        create(&app, employee_body(email, doc), None).await;
    }

    let (status, headers, body) = send(
        &app,
        Method::GET,
        "/api/v1/employees?page=2&offset=2&fieldName=email&order=DESC",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(headers.get("x-total-count").unwrap(), "3");
    assert_eq!(body["statusCode"], 206);
    assert_eq!(body["metadata"]["totalItems"], 3);
    assert_eq!(body["metadata"]["totalPages"], 2);
    assert_eq!(body["metadata"]["page"], 2);
    assert_eq!(body["metadata"]["offset"], 2);
    let rows = body["data"]["response"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "a@x.com");

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/api/v1/employees?fieldName=salary",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["detail"], "Unknown sort field: salary");
}

#[tokio::test]
async fn deleted_employee_leaves_listing_but_not_lookup() {
    let app = app(state(false));
    let (_, created) = create(&app, employee_body("a@x.com", "12345678909"), None).await;
    let id = created["data"]["response"]["id"].as_str().unwrap();
    let uri = format!("/api/v1/employees/{id}");

    let (status, _, body) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["response"], true);

    let (status, _, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["response"]["isDeleted"], true);

    let (status, _, _) = send(&app, Method::GET, "/api/v1/employees", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn login_then_use_token_on_protected_routes() {
    let state = state(true);
    seed::run(state.store().employees(), state.hasher(), &state.config().seed).await;
    let app = app(state);

    let (status, _, body) = send(&app, Method::GET, "/api/v1/employees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(body["correlationId"].as_str().is_some());

    for password in ["wrong-password", "admin@123"] {
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "nobody@employee.com", "password": password })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid email or password");
    }
    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        Some(json!({ "email": "admin@employee.com", "password": "wrong-password" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid email or password");

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        Some(json!({ "email": "admin@employee.com", "password": "admin@123" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login = &body["data"]["response"];
    assert_eq!(login["employee"]["role"], "Director");
    assert!(login["expiresAt"].is_string());
    let token = login["token"].as_str().unwrap().to_string();

    let (status, body) = create(&app, employee_body("a@x.com", "12345678909"), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["response"]["createdBy"],
        "admin@employee.com"
    );

    let (status, _, _) = send(&app, Method::GET, "/api/v1/employees", None, Some(&token)).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
}

#[tokio::test]
async fn customers_crud_round() {
    let app = app(state(false));
    let body = json!({
        "fullName": "Maria Silva",
        "email": "maria@example.com",
        "documentNumber": "529.982.247-25",
        "gender": "F",
        "birthDate": "1985-03-02",
        "phone": "11987654321",
        "address": {
            "street": "Rua das Flores",
            "number": "100",
            "neighborhood": "Centro",
            "city": "Sao Paulo",
            "state": "SP",
            "country": "Brasil",
            "zipCode": "01310100"
        },
        "acceptTermsUse": true,
        "acceptPrivacyPolicy": true
    });

    let (status, _, created) =
        send(&app, Method::POST, "/api/v1/customers", Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["response"]["id"].as_str().unwrap();
    assert_eq!(created["data"]["response"]["address"]["zipCode"], "01310100");

    let (status, headers, _) = send(
        &app,
        Method::GET,
        "/api/v1/customers?fullName=maria",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(headers.get("x-total-count").unwrap(), "1");

    let (status, _, _) = send(
        &app,
        Method::GET,
        "/api/v1/customers?page=9223372036854775807&offset=10",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/api/v1/customers/{id}");
    let (status, _, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let removed = &body["data"]["response"];
    assert_eq!(removed["isDeleted"], true);
    assert_eq!(removed["address"]["isDeleted"], true);
    assert!(removed["address"]["deletedAt"].is_string());
    assert_eq!(removed["address"]["status"], "Deleted");

    let (status, _, _) = send(&app, Method::GET, "/api/v1/customers", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn probes_report_store_state() {
    let state = state(false);
    let store = state.store().clone();
    let app = app(state);

    let (status, _, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dependencies"]["memory"]["healthy"], true);

    store.set_offline(true);
    let (status, _, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    let (status, _, body) = send(&app, Method::GET, "/api/v1/employees", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "REPOSITORY_CONNECTION_FAILED");
    assert!(body["correlationId"].as_str().unwrap().starts_with("req_"));
    assert!(
        store.employees().get_by_id(uuid::Uuid::nil()).await.is_err(),
        "store stays offline"
    );
}
