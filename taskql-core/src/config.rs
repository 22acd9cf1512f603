//! Store coordinates and pool sizing
//!
//! Fixed at process start. Either a full `DATABASE_URL` or the individual
//! `DB_HOST` / `DB_PORT` / `DB_NAME` / `DB_USER` / `DB_PASSWORD` variables
//! select the store instance; `DB_POOL_SIZE` caps concurrent operations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

use crate::error::{ConfigError, StoreError};

/// Default maximum connections for the pool.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Default time to wait for a free connection before giving up.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Takes precedence over the individual fields when set
    pub database_url: Option<String>,
    pub pool_size: u32,
    pub acquire_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "tasks".to_string(),
            user: None,
            password: None,
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = get("DB_PORT") {
            config.port = parse("DB_PORT", &port)?;
        }
        if let Some(database) = get("DB_NAME") {
            config.database = database;
        }
        config.user = get("DB_USER");
        config.password = get("DB_PASSWORD");
        config.database_url = get("DATABASE_URL");
        if let Some(size) = get("DB_POOL_SIZE") {
            config.pool_size = parse("DB_POOL_SIZE", &size)?;
            if config.pool_size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "DB_POOL_SIZE",
                    value: size,
                });
            }
        }
        if let Some(secs) = get("DB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout = Duration::from_secs(parse("DB_ACQUIRE_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Connection options for the configured store instance.
    pub fn connect_options(&self) -> Result<PgConnectOptions, StoreError> {
        if let Some(url) = &self.database_url {
            return PgConnectOptions::from_str(url).map_err(StoreError::from);
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database);
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

// Credentials stay out of logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("pool_size", &self.pool_size)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
    })
}
