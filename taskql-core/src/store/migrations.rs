//! Database migrations for the tasks table

use super::TaskPool;
use crate::error::StoreError;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Create the tasks table if it doesn't exist (idempotent).
pub async fn run(pool: &TaskPool) -> Result<(), StoreError> {
    tracing::info!("Running task migrations...");

    let mut conn = pool.acquire().await?;
    sqlx::query(CREATE_TASKS).execute(&mut *conn).await?;

    tracing::info!("Task migrations complete");
    Ok(())
}
