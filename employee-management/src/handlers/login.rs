//! Credential check and token issuance

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::invalid;
use super::validation::Validator;
use crate::auth::{PasswordHasher, TokenGenerator};
use crate::context::RequestContext;
use crate::domain::{Employee, EmployeeRole};
use crate::error::Result;
use crate::repository::{Filter, FilterCondition, ReadRepository};
use crate::response::ApiResponse;

/// Shared by unknown emails and wrong passwords
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Body of `POST /api/v1/auth/login`
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public profile returned with a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: EmployeeRole,
}

impl From<&Employee> for EmployeeProfile {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            role: employee.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub employee: EmployeeProfile,
}

/// Verify credentials and issue a bearer token
///
/// An unknown email, a deleted or inactive employee and a wrong password all
/// answer 401 with the same message.
pub async fn login<R, T>(
    repo: &R,
    hasher: &PasswordHasher,
    tokens: &T,
    ctx: &RequestContext,
    request: LoginRequest,
) -> Result<ApiResponse<LoginResponse>>
where
    R: ReadRepository<Employee>,
    T: TokenGenerator,
{
    let mut v = Validator::new();
    v.email(&request.email)
        .check(!request.password.is_empty(), "Password is required");
    if let Err(errors) = v.finish() {
        return Ok(invalid(errors));
    }

    let email = request.email.trim().to_lowercase();
    let filter = Filter::new().and(FilterCondition::eq("email", email.as_str()));
    let employee = repo
        .find(&filter)
        .await?
        .into_iter()
        .find(Employee::can_sign_in);

    let Some(employee) = employee else {
        warn!(request_id = %ctx.request_id, "Login rejected: unknown or inactive account");
        return Ok(rejected());
    };

    if !hasher.verify(&request.password, &employee.password_hash)? {
        warn!(request_id = %ctx.request_id, employee_id = %employee.id, "Login rejected: wrong password");
        return Ok(rejected());
    }

    let issued = tokens.issue(&employee)?;
    info!(request_id = %ctx.request_id, employee_id = %employee.id, "Employee signed in");

    Ok(ApiResponse::success(
        LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            employee: EmployeeProfile::from(&employee),
        },
        StatusCode::OK,
    ))
}

fn rejected() -> ApiResponse<LoginResponse> {
    ApiResponse::error(INVALID_CREDENTIALS_MESSAGE, std::iter::empty::<String>())
        .with_status(StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtGenerator, PasswordConfig};
    use crate::domain::employee_fixtures::employee;
    use crate::middleware::{JwtAuth, TokenValidator};
    use crate::repository::{InMemoryRepository, WriteRepository};

    struct Fixture {
        repo: InMemoryRepository<Employee>,
        hasher: PasswordHasher,
        tokens: JwtGenerator,
        jwt: JwtConfig,
    }

    async fn fixture() -> Fixture {
        let hasher = PasswordHasher::new(&PasswordConfig {
            memory_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
            min_password_length: 8,
        })
        .unwrap();
        let jwt = JwtConfig {
            secret: "login-test-secret".into(),
            ..Default::default()
        };

        let repo = InMemoryRepository::new();
        let mut ana = employee("ana@x.com", "12345678909");
        ana.password_hash = hasher.hash("correct-horse").unwrap();
        repo.add(&ana).await.unwrap();

        let mut gone = employee("gone@x.com", "52998224725");
        gone.password_hash = hasher.hash("correct-horse").unwrap();
        gone.audit.is_deleted = true;
        repo.add(&gone).await.unwrap();

        Fixture {
            repo,
            hasher,
            tokens: JwtGenerator::new(&jwt).unwrap(),
            jwt,
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let f = fixture().await;
        let ctx = RequestContext::system();

        let response = login(&f.repo, &f.hasher, &f.tokens, &ctx, credentials("ANA@x.com", "correct-horse"))
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);

        let body = response.into_payload().unwrap();
        assert_eq!(body.employee.email, "ana@x.com");
        assert!(body.expires_at > Utc::now());

        let claims = JwtAuth::new(&f.jwt).unwrap().validate_token(&body.token).unwrap();
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.employee_id(), Some(body.employee.id));
        assert_eq!(claims.name, "Ana Souza");
    }

    #[tokio::test]
    async fn test_failures_share_one_message() {
        let f = fixture().await;
        let ctx = RequestContext::system();

        for request in [
            credentials("nobody@x.com", "correct-horse"),
            credentials("ana@x.com", "wrong-password"),
            credentials("gone@x.com", "correct-horse"),
        ] {
            let response = login(&f.repo, &f.hasher, &f.tokens, &ctx, request)
                .await
                .unwrap();
            assert_eq!(response.status_code, 401);
            assert_eq!(response.error.unwrap().message, INVALID_CREDENTIALS_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_malformed_request_is_invalid() {
        let f = fixture().await;
        let response = login(
            &f.repo,
            &f.hasher,
            &f.tokens,
            &RequestContext::system(),
            credentials("not-an-email", ""),
        )
        .await
        .unwrap();
        assert_eq!(response.status_code, 400);
    }
}
