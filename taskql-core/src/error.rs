//! Error types for taskql-core
//!
//! Nothing here is retried or recovered locally; every error is surfaced
//! to the caller (the GraphQL execution engine), which owns formatting.

use thiserror::Error;

use crate::models::ValidationError;

pub type TaskResult<T> = Result<T, TaskError>;

/// Error returned by a resolver
#[derive(Error, Debug)]
pub enum TaskError {
    /// Missing or malformed input, raised before any store access
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store could not run the statement
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Store(StoreError::PoolExhausted) => "POOL_EXHAUSTED",
            Self::Store(StoreError::Connection(_)) => "CONNECTION_ERROR",
            Self::Store(StoreError::Statement(_)) => "STORE_ERROR",
        }
    }
}

/// Failure at the connection pool or data store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Every connection stayed checked out for the whole acquire timeout
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// The store could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// The statement itself failed (constraint violation, syntax, ...)
    #[error("{0}")]
    Statement(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted,
            sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::WorkerCrashed => Self::Connection(e.to_string()),
            other => Self::Statement(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for TaskError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store(e.into())
    }
}

/// Store configuration could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}
