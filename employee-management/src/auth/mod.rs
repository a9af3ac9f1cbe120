//! Password hashing and token issuance
//!
//! Token validation lives with the request middleware in
//! [`crate::middleware::jwt`].

pub mod config;
pub mod password;
pub mod tokens;

pub use config::{JwtConfig, PasswordConfig, SecurityConfig};
pub use password::PasswordHasher;
pub use tokens::jwt_generator::JwtGenerator;
pub use tokens::{IssuedToken, TokenGenerator};
