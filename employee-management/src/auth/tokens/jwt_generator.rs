//! HS256 JWT generation

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::auth::config::JwtConfig;
use crate::domain::Employee;
use crate::error::Error;
use crate::middleware::Claims;

use super::{IssuedToken, TokenGenerator};

/// JWT token generator
#[derive(Clone)]
pub struct JwtGenerator {
    encoding_key: Arc<EncodingKey>,
    lifetime: Duration,
    issuer: Option<String>,
    audience: Option<String>,
}

impl std::fmt::Debug for JwtGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtGenerator")
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtGenerator {
    /// Create a generator from configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` when no secret is configured or the lifetime is not positive.
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let secret = require_secret(config)?;
        if config.expiration_minutes <= 0 {
            return Err(Error::Config(Box::new(figment::Error::from(format!(
                "security.jwt.expiration_minutes must be positive, got {}",
                config.expiration_minutes
            )))));
        }

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret)),
            lifetime: Duration::from_secs(config.expiration_minutes as u64 * 60),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }
}

impl TokenGenerator for JwtGenerator {
    fn issue(&self, employee: &Employee) -> Result<IssuedToken, Error> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.lifetime.as_secs() as i64);

        let claims = Claims {
            sub: employee.id.to_string(),
            email: employee.email.clone(),
            name: employee.full_name(),
            role: employee.role.to_string(),
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
            jti: Some(uuid::Uuid::new_v4().to_string()),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Jwt(Box::new(e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn default_lifetime(&self) -> Duration {
        self.lifetime
    }
}

/// Configured secret bytes, or a configuration error
pub(crate) fn require_secret(config: &JwtConfig) -> Result<&[u8], Error> {
    if config.secret.trim().is_empty() {
        return Err(Error::Config(Box::new(figment::Error::from(
            "security.jwt.secret must be set to issue or validate tokens",
        ))));
    }
    Ok(config.secret.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee_fixtures;
    use crate::middleware::{JwtAuth, TokenValidator};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".into(),
            issuer: Some("employee-management".into()),
            audience: Some("admin-ui".into()),
            expiration_minutes: 30,
        }
    }

    #[test]
    fn test_missing_secret_rejected() {
        let result = JwtGenerator::new(&JwtConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let result = JwtGenerator::new(&JwtConfig {
            expiration_minutes: 0,
            ..config()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_issue_and_validate() {
        let generator = JwtGenerator::new(&config()).unwrap();
        let employee = employee_fixtures::employee("ana@x.com", "12345678909");

        let issued = generator.issue(&employee).unwrap();
        let remaining = issued.expires_at - Utc::now();
        assert!(remaining.num_minutes() >= 29 && remaining.num_minutes() <= 30);

        let claims = JwtAuth::new(&config())
            .unwrap()
            .validate_token(&issued.token)
            .unwrap();
        assert_eq!(claims.sub, employee.id.to_string());
        assert_eq!(claims.email, "ana@x.com");
        assert_eq!(claims.name, "Ana Souza");
        assert_eq!(claims.role, "Analyst");
        assert!(claims.jti.is_some());
        assert_eq!(claims.iss.as_deref(), Some("employee-management"));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let generator = JwtGenerator::new(&config()).unwrap();
        let employee = employee_fixtures::employee("ana@x.com", "12345678909");
        let issued = generator.issue(&employee).unwrap();

        let other = JwtAuth::new(&JwtConfig {
            secret: "another-secret".into(),
            ..config()
        })
        .unwrap();
        assert!(other.validate_token(&issued.token).is_err());
    }
}
