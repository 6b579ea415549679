//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" })),
        )
        .init();

    match cli.command {
        Commands::Update(args) => commands::update::execute(args).await,
        Commands::Keygen(args) => commands::keygen::execute(&args),
        Commands::Serve(args) => commands::serve::execute(args).await,
    }
}
