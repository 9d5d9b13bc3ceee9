//! Record store configuration
//!
//! Loaded from environment variables by `StoreConfig::from_env`, or built by
//! hand and passed to `PgMemberStore::connect`:
//! - `MEMBERDESK_DB_HOST` (default: localhost)
//! - `MEMBERDESK_DB_PORT` (default: 5432)
//! - `MEMBERDESK_DB_USER` (default: postgres)
//! - `MEMBERDESK_DB_PASSWORD` (default: empty)
//! - `MEMBERDESK_DB_NAME` (default: memberdesk)
//! - `MEMBERDESK_DB_CONNECT_TIMEOUT_SECS` (default: 10)
//! - `MEMBERDESK_DB_STATEMENT_TIMEOUT_SECS` (default: 10)
//! - `MEMBERDESK_DB_MAX_CONNECTIONS` (default: 5)
//! - `MEMBERDESK_UNIQUE_EMAIL` (default: false)

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Connection and schema options for the PostgreSQL record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,

    /// Limit for establishing a connection or waiting on the pool
    pub connect_timeout: Duration,

    /// Server-side limit for a single statement
    pub statement_timeout: Duration,

    pub max_connections: u32,

    /// Enforce one submission per email address
    pub unique_email: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "memberdesk".to_string(),
            connect_timeout: Duration::from_secs(10),
            statement_timeout: Duration::from_secs(10),
            max_connections: 5,
            unique_email: false,
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

        Ok(Self {
            host: get("MEMBERDESK_DB_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "MEMBERDESK_DB_PORT")?.unwrap_or(defaults.port),
            user: get("MEMBERDESK_DB_USER").unwrap_or(defaults.user),
            password: lookup("MEMBERDESK_DB_PASSWORD").unwrap_or(defaults.password),
            database: get("MEMBERDESK_DB_NAME").unwrap_or(defaults.database),
            connect_timeout: parse_var(&lookup, "MEMBERDESK_DB_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            statement_timeout: parse_var(&lookup, "MEMBERDESK_DB_STATEMENT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.statement_timeout),
            max_connections: parse_var(&lookup, "MEMBERDESK_DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            unique_email: parse_var(&lookup, "MEMBERDESK_UNIQUE_EMAIL")?
                .unwrap_or(defaults.unique_email),
        })
    }

    /// sqlx connect options, with the statement timeout set per session.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .application_name("memberdesk")
            .options([(
                "statement_timeout",
                self.statement_timeout.as_millis().to_string(),
            )])
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
