//! Serve the GraphQL API over HTTP

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use taskql_core::store::migrations;
use taskql_core::{MemoryStore, TaskResolvers, TaskStore};
use taskql_server::{build_schema, run_server, AppState, SchemaOptions, ServerConfig, StoreBackend};

use super::StoreArgs;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:4000", env = "TASKQL_BIND")]
    pub bind: SocketAddr,

    /// Run against an in-process store instead of Postgres (data is lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Create the tasks table before serving
    #[arg(long)]
    pub migrate: bool,

    /// Disable schema introspection and the playground
    #[arg(long)]
    pub no_introspection: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let (store, backend) = if args.memory {
        tracing::warn!("Using in-memory store; tasks are not persisted");
        let store: Arc<dyn TaskStore> = Arc::new(MemoryStore::new());
        (store, StoreBackend::Memory)
    } else {
        let pool = args.store.connect().await?;
        if args.migrate {
            migrations::run(&pool).await.context("Migration failed")?;
        }
        let store: Arc<dyn TaskStore> = Arc::new(pool.clone());
        (store, StoreBackend::Postgres(pool))
    };

    let introspection = !args.no_introspection;
    let schema = build_schema(TaskResolvers::new(store), SchemaOptions { introspection });
    let state = AppState {
        schema,
        backend,
        playground: introspection,
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting taskql server on {}", config.bind_addr);
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
