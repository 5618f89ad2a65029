use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | floor.db | SQLite database file |
/// | DB_MAX_CONNECTIONS | 5 | pool size |
/// | HTTP_HOST | 0.0.0.0 | bind host |
/// | HTTP_PORT | 8080 | bind port |
/// | ENVIRONMENT | development | development / staging / production |
/// | REQUEST_TIMEOUT_MS | 5000 | deadline for table/order coordination |
/// | JWT_SECRET | generated in development | HS256 secret, 32+ characters |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | floor-server / floor-clients | token claims |
/// | LOG_LEVEL | info | default log filter |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | unset | daily rolling log files |
///
/// Malformed numbers and booleans are errors, not silent defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub db_max_connections: u32,
    pub http_host: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub request_timeout_ms: u64,
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load from the process environment (call `dotenv` first)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        if !matches!(environment.as_str(), "development" | "staging" | "production") {
            return Err(ServerError::Config(format!(
                "ENVIRONMENT must be development, staging or production, got {environment}"
            )));
        }
        let jwt = JwtConfig::from_lookup(&lookup, environment == "development")
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "floor.db".into()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: parse_or(&lookup, "HTTP_PORT", 8080)?,
            request_timeout_ms: parse_or(&lookup, "REQUEST_TIMEOUT_MS", 5000)?,
            jwt,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or(&lookup, "LOG_JSON", false)?,
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()),
            environment,
        })
    }

    /// Configuration for an isolated instance (tests, tooling)
    pub fn with_overrides(database_path: impl Into<String>, jwt: JwtConfig) -> Self {
        Self {
            database_path: database_path.into(),
            db_max_connections: 5,
            http_host: "127.0.0.1".into(),
            http_port: 0,
            environment: "development".into(),
            request_timeout_ms: 5000,
            jwt,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ServerError::Config(format!("{key} has an invalid value: {raw}"))),
    }
}
