//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `EMS_`, nested keys split on `__`, e.g. `EMS_SERVICE__PORT`)
//! 2. Current working directory: ./config.toml
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::auth::SecurityConfig;
use crate::error::Result;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "EMS_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Database configuration; absent means the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Password hashing, tokens and route protection
    #[serde(default)]
    pub security: SecurityConfig,

    /// Initial administrator account
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Whether internal error details may be returned to callers
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("dev")
            || self.environment.eq_ignore_ascii_case("development")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// CORS mode: "permissive", "restrictive" or "disabled"
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            cors_mode: default_cors_mode(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum idle connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Maximum retry attempts for establishing database connection
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retry attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

/// Master account created at startup when missing
#[derive(Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_seed_email")]
    pub email: String,

    #[serde(default = "default_seed_password")]
    pub password: String,

    #[serde(default = "default_seed_first_name")]
    pub first_name: String,

    #[serde(default = "default_seed_last_name")]
    pub last_name: String,

    #[serde(default = "default_seed_document")]
    pub document: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email: default_seed_email(),
            password: default_seed_password(),
            first_name: default_seed_first_name(),
            last_name: default_seed_last_name(),
            document: default_seed_document(),
        }
    }
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("enabled", &self.enabled)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    2
}

fn default_body_limit_mb() -> usize {
    10
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_seed_email() -> String {
    "admin@employee.com".to_string()
}

fn default_seed_password() -> String {
    "admin@123".to_string()
}

fn default_seed_first_name() -> String {
    "Admin".to_string()
}

fn default_seed_last_name() -> String {
    "Master".to_string()
}

fn default_seed_document() -> String {
    "00000000000".to_string()
}

impl Config {
    /// Load configuration from defaults, `./config.toml` and `EMS_` variables
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        }

        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Get database URL
    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().map(|db| db.url.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "employee-management".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            database: None,
            security: SecurityConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert!(config.service.is_development());
        assert!(config.database.is_none());
        assert_eq!(config.seed.email, "admin@employee.com");
        assert_eq!(config.middleware.cors_mode, "permissive");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "ems-test"
port = 9100
environment = "production"

[database]
url = "postgres://localhost/ems"

[security]
require_auth = false

[security.jwt]
secret = "from-file"

[seed]
enabled = false
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "ems-test");
        assert_eq!(config.service.port, 9100);
        assert!(!config.service.is_development());
        assert_eq!(config.database_url(), Some("postgres://localhost/ems"));
        assert_eq!(config.database.as_ref().unwrap().max_connections, 20);
        assert!(!config.security.require_auth);
        assert_eq!(config.security.jwt.secret, "from-file");
        assert!(!config.seed.enabled);
        // untouched sections keep their defaults
        assert_eq!(config.middleware.body_limit_mb, 10);
        assert_eq!(config.seed.email, "admin@employee.com");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.service.name, "employee-management");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nport = \"not a number\"").unwrap();
        let result = Config::load_from(file.path());
        assert!(matches!(result, Err(crate::error::Error::Config(_))));
    }

    #[test]
    fn test_seed_debug_redacts_password() {
        let rendered = format!("{:?}", SeedConfig::default());
        assert!(!rendered.contains("admin@123"));
    }
}
