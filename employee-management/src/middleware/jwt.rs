//! JWT authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::token::{extract_token, Claims, TokenValidator};
use crate::auth::{tokens::jwt_generator::require_secret, JwtConfig};
use crate::error::Error;

/// JWT authentication middleware state
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtAuth {
    /// Create the validator for HS256 tokens signed with the configured secret
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let secret = require_secret(config)?;

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        }

        Ok(Self {
            decoding_key: Arc::new(DecodingKey::from_secret(secret)),
            validation,
        })
    }

    /// Middleware function to validate JWT and inject claims
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        let token = extract_token(request.headers()).inspect_err(|_| {
            tracing::warn!(path = %request.uri().path(), "Request without bearer token rejected");
        })?;

        let claims = auth.validate_token(&token).inspect_err(|e| {
            tracing::warn!(path = %request.uri().path(), error = %e, "Bearer token rejected");
        })?;

        tracing::debug!(subject = %claims.sub, role = %claims.role, "Bearer token accepted");
        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }
}

impl TokenValidator for JwtAuth {
    fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
