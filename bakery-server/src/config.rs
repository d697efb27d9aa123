//! Server configuration

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PostgreSQL connection settings (`DB_*`)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, BoxError> {
        let ssl_mode = PgSslMode::from_str(&self.sslmode)
            .map_err(|_| format!("invalid DB_SSLMODE: {}", self.sslmode))?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode))
    }
}

/// Midtrans Snap settings (`MIDTRANS_*`)
#[derive(Debug, Clone)]
pub struct MidtransConfig {
    /// Base URL, e.g. `https://app.sandbox.midtrans.com`
    pub endpoint: String,
    pub server_key: String,
    pub client_key: String,
    pub merchant_id: String,
    pub timeout: Duration,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub midtrans: MidtransConfig,
    pub environment: Environment,
    pub http_port: u16,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_name = lookup("SERVER_ENV").unwrap_or_else(|| "development".into());
        let environment = Environment::parse(&env_name).ok_or_else(|| {
            format!("SERVER_ENV must be development or production, got {env_name}")
        })?;

        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());

        Ok(Self {
            database: DatabaseConfig {
                host: var_or("DB_HOST", "localhost"),
                port: parse_or(&lookup, "DB_PORT", 5432)?,
                user: var_or("DB_USER", "postgres"),
                password: var_or("DB_PASSWORD", ""),
                name: var_or("DB_NAME", "bakery"),
                sslmode: var_or("DB_SSLMODE", "disable"),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            },
            jwt_secret: require_secret(&lookup, "JWT_SECRET", environment)?,
            jwt_expiry_hours: parse_or(&lookup, "JWT_EXPIRY_HOURS", 24)?,
            midtrans: MidtransConfig {
                endpoint: var_or("MIDTRANS_ENDPOINT", "https://app.sandbox.midtrans.com")
                    .trim_end_matches('/')
                    .to_string(),
                server_key: require_secret(&lookup, "MIDTRANS_SERVER_KEY", environment)?,
                client_key: var_or("MIDTRANS_CLIENT_KEY", ""),
                merchant_id: var_or("MIDTRANS_MERCHANT_ID", ""),
                timeout: Duration::from_secs(parse_or(&lookup, "GATEWAY_TIMEOUT_SECS", 10)?),
            },
            environment,
            http_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Secrets must be set and non-empty outside development.
fn require_secret<F>(lookup: &F, name: &str, environment: Environment) -> Result<String, BoxError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ if environment.is_production() => {
            Err(format!("{name} must be set in {environment} environment").into())
        }
        _ => Ok(format!("dev-{name}-not-for-production")),
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, BoxError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{name} has an invalid value: {raw}").into()),
        None => Ok(default),
    }
}
