//! taskql-server: GraphQL-over-HTTP front end for taskql
//!
//! Declares the task schema, binds it to the core resolvers, and serves
//! it with axum.

pub mod http;
pub mod schema;

pub use http::{run_server, AppState, ServerConfig, StoreBackend};
pub use schema::{build_schema, schema_sdl, SchemaOptions, TaskSchema};
