//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::{AppState, StoreBackend};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

/// Connection counts at the time of the check
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (store, pool) = match &state.backend {
        StoreBackend::Postgres(pool) => (
            "postgres",
            Some(PoolStats {
                size: pool.size(),
                idle: pool.idle(),
            }),
        ),
        StoreBackend::Memory => ("memory", None),
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store,
        pool,
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use taskql_core::{MemoryStore, TaskResolvers};

    use super::*;
    use crate::schema::{build_schema, SchemaOptions};

    #[tokio::test]
    async fn memory_backend_reports_no_pool() {
        let resolvers = TaskResolvers::new(Arc::new(MemoryStore::new()));
        let state = Arc::new(AppState {
            schema: build_schema(resolvers, SchemaOptions::default()),
            backend: StoreBackend::Memory,
            playground: false,
        });

        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.store, "memory");
        assert!(body.pool.is_none());
    }
}
