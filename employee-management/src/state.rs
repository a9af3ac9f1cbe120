//! Application state management

use std::sync::Arc;

use crate::{
    auth::{JwtGenerator, PasswordHasher},
    config::Config,
    error::Result,
    repository::Store,
};

/// Application state shared across handlers
///
/// Generic over the [`Store`] so the same router runs on PostgreSQL in
/// production and on the in-memory store in tests.
#[derive(Clone)]
pub struct AppState<S: Store> {
    config: Arc<Config>,
    store: S,
    hasher: PasswordHasher,
    tokens: JwtGenerator,
}

impl<S: Store> AppState<S> {
    /// Build the state, deriving the hasher and token issuer from `config`
    ///
    /// # Errors
    ///
    /// `Error::Config` when the Argon2 parameters are invalid or no token
    /// secret is configured.
    pub fn new(config: Config, store: S) -> Result<Self> {
        let hasher = PasswordHasher::new(&config.security.password)?;
        let tokens = JwtGenerator::new(&config.security.jwt)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            hasher,
            tokens,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &JwtGenerator {
        &self.tokens
    }
}
