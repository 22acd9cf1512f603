//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. A checkout is a
//! `PoolConnection`, which goes back to the pool when dropped, so a failed
//! statement never leaks a connection.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::{Query, QueryAs};
use sqlx::{Connection, Encode, PgConnection, PgPool, Postgres, Type};

use super::TaskStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::Task;
use crate::statement::{SqlParam, Statement};

/// Bounded pool of live Postgres connections
#[derive(Debug, Clone)]
pub struct TaskPool {
    pool: PgPool,
}

impl TaskPool {
    /// Create a pool and open the first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pool = TaskPool::connect(&StoreConfig::from_env()?).await?;
    /// ```
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = Self::connect_lazy(config)?;
        drop(pool.acquire().await?);
        tracing::info!(
            host = %config.host,
            database = %config.database,
            max_connections = config.pool_size,
            "connection pool ready"
        );
        Ok(pool)
    }

    /// Create a pool that opens connections on first use.
    pub fn connect_lazy(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = pool_options(config).connect_lazy_with(config.connect_options()?);
        Ok(Self { pool })
    }

    /// Check out one connection.
    ///
    /// Fails with `PoolExhausted` only when every connection is checked out
    /// and none frees up within the acquire timeout. An unreachable store
    /// fails at once with `Connection`; refused connects are not retried.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        if let Some(conn) = self.pool.try_acquire() {
            return Ok(conn);
        }

        // Cold pool: connect directly so a refused connect fails at once
        if self.pool.size() == 0 && !self.pool.is_closed() {
            self.probe().await.map_err(|err| self.acquire_failed(err))?;
        }

        self.pool.acquire().await.map_err(|e| {
            let err = match e {
                sqlx::Error::PoolTimedOut if self.has_capacity() => StoreError::Connection(
                    "no connection could be opened within the acquire timeout".into(),
                ),
                other => StoreError::from(other),
            };
            self.acquire_failed(err)
        })
    }

    async fn probe(&self) -> Result<(), StoreError> {
        let options = self.pool.connect_options();
        let deadline = self.pool.options().get_acquire_timeout();

        match tokio::time::timeout(deadline, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => {
                if let Err(e) = conn.close().await {
                    tracing::debug!(error = %e, "probe connection close failed");
                }
                Ok(())
            }
            Ok(Err(e)) => Err(StoreError::Connection(e.to_string())),
            Err(_) => Err(StoreError::Connection(
                "timed out connecting to the store".into(),
            )),
        }
    }

    fn has_capacity(&self) -> bool {
        self.pool.size() < self.pool.options().get_max_connections()
    }

    fn acquire_failed(&self, err: StoreError) -> StoreError {
        tracing::warn!(
            error = %err,
            size = self.pool.size(),
            idle = self.pool.num_idle(),
            "connection acquire failed"
        );
        err
    }

    /// Connections currently open (idle or checked out)
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    pub fn idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close every connection; pending acquires fail with `Connection`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(config: &StoreConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
}

/// Query types that accept positional parameters
trait BindParams<'q>: Sized {
    fn bind_value<T>(self, value: T) -> Self
    where
        T: 'q + Encode<'q, Postgres> + Type<Postgres>;

    fn bind_param(self, param: &'q SqlParam) -> Self {
        match param {
            SqlParam::Id(id) => self.bind_value(*id),
            SqlParam::Text(text) => self.bind_value(text.as_str()),
            SqlParam::Null => self.bind_value(None::<String>),
        }
    }

    fn bind_all(self, params: &'q [SqlParam]) -> Self {
        params.iter().fold(self, Self::bind_param)
    }
}

impl<'q> BindParams<'q> for Query<'q, Postgres, PgArguments> {
    fn bind_value<T>(self, value: T) -> Self
    where
        T: 'q + Encode<'q, Postgres> + Type<Postgres>,
    {
        self.bind(value)
    }
}

impl<'q> BindParams<'q> for QueryAs<'q, Postgres, Task, PgArguments> {
    fn bind_value<T>(self, value: T) -> Self
    where
        T: 'q + Encode<'q, Postgres> + Type<Postgres>,
    {
        self.bind(value)
    }
}

#[async_trait]
impl TaskStore for TaskPool {
    async fn fetch(&self, stmt: &Statement) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "fetch");

        let rows = sqlx::query_as::<_, Task>(&stmt.sql)
            .bind_all(&stmt.params)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError> {
        let mut conn = self.acquire().await?;
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "execute");

        let result = sqlx::query(&stmt.sql)
            .bind_all(&stmt.params)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
