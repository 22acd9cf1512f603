//! CLI subcommands

pub mod migrate;
pub mod serve;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use taskql_core::{StoreConfig, TaskPool};

pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};

/// Store coordinates; flags override the `DB_*` / `DATABASE_URL` environment
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Full connection URL (overrides host/port/name)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Database host
    #[arg(long)]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long)]
    pub db_port: Option<u16>,

    /// Database name
    #[arg(long)]
    pub db_name: Option<String>,

    /// Maximum concurrent connections
    #[arg(long)]
    pub pool_size: Option<u32>,

    /// Seconds to wait for a free connection
    #[arg(long)]
    pub acquire_timeout: Option<u64>,
}

impl StoreArgs {
    /// Environment config with flag overrides applied.
    pub fn load(&self) -> Result<StoreConfig> {
        let mut config = StoreConfig::from_env().context("Invalid database environment")?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut StoreConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        if let Some(host) = &self.db_host {
            config.host = host.clone();
        }
        if let Some(port) = self.db_port {
            config.port = port;
        }
        if let Some(name) = &self.db_name {
            config.database = name.clone();
        }
        if let Some(size) = self.pool_size {
            config.pool_size = size.max(1);
        }
        if let Some(secs) = self.acquire_timeout {
            config.acquire_timeout = Duration::from_secs(secs);
        }
    }

    /// Connect the pool, failing fast if the store is unreachable.
    pub async fn connect(&self) -> Result<TaskPool> {
        let config = self.load()?;
        tracing::debug!(?config, "store config");
        TaskPool::connect(&config)
            .await
            .context("Failed to create database pool")
    }
}
