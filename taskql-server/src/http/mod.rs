//! HTTP transport layer
//!
//! Axum server with:
//! - GraphQL endpoint (POST /graphql) and optional playground (GET /graphql)
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown

pub mod routes;
pub mod server;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, StoreBackend};
