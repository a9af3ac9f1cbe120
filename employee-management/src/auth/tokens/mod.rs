//! Token issuance
//!
//! Signed bearer tokens are issued at login; the matching validator lives in
//! [`crate::middleware::jwt`].
//!
//! # Example
//!
//! ```rust,ignore
//! use employee_management::auth::{JwtGenerator, TokenGenerator};
//!
//! let generator = JwtGenerator::new(&config.security.jwt)?;
//! let issued = generator.issue(&employee)?;
//! println!("expires at {}", issued.expires_at);
//! ```

pub mod jwt_generator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::Employee;
use crate::error::Error;

/// Token generation trait
pub trait TokenGenerator: Send + Sync + Clone {
    /// Issue a token identifying `employee`
    fn issue(&self, employee: &Employee) -> Result<IssuedToken, Error>;

    /// Lifetime of issued tokens
    fn default_lifetime(&self) -> Duration;
}

/// A signed token and its absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
