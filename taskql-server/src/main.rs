//! taskql - GraphQL task API over Postgres
//!
//! Subcommands:
//! - `serve`: run the HTTP server (POST /graphql)
//! - `migrate`: create the tasks table
//! - `schema`: print the GraphQL SDL

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "taskql",
    author,
    version,
    about = "GraphQL API for a single task table backed by Postgres"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the GraphQL HTTP server
    Serve(commands::ServeArgs),
    /// Create the tasks table if it doesn't exist
    Migrate(commands::MigrateArgs),
    /// Print the GraphQL schema (SDL)
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up DB_* variables from a local .env, if present
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug })
        .context("failed to initialize tracing")?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Schema => print!("{}", taskql_server::schema_sdl()),
    }

    Ok(())
}
