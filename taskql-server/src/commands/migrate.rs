//! Create the tasks table

use anyhow::{Context, Result};
use clap::Args;
use taskql_core::store::migrations;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.store.connect().await?;
    migrations::run(&pool).await.context("Migration failed")?;
    pool.close().await;
    Ok(())
}
