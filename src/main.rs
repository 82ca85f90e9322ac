//! dalil server binary.

use anyhow::Result;
use clap::Parser;
use dalil::api::{AppState, start_server};
use dalil::cli::{Cli, Command};
use dalil::config::{Config, ConfigLoader};
use dalil::logging::{self, LogTarget};
use dalil::tasks::{InMemoryTaskRepository, TaskService};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::load(cli.config.as_deref())?;

    // Override from CLI arguments
    let config = loader.config_mut();
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.verbose {
        config.logging.global_verbosity = config.logging.global_verbosity.max(1);
    }

    logging::init(
        &LogTarget::parse(&cli.log),
        loader.config().app_env,
        &loader.config().logging,
    )?;

    for warning in loader.warnings() {
        warn!("Ignoring configuration value: {}", warning);
    }
    if let Some(path) = loader.config_path() {
        info!(path = %path.display(), "Loaded config file");
    }

    let config = loader.into_config();
    match cli.command {
        Some(Command::Config) => {
            print!("{}", config.to_yaml()?);
        }
        Some(Command::Serve) | None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let state = AppState::new(TaskService::new(repository));

    let handle = start_server(state, &config.server).await?;
    info!(env = %config.app_env, addr = %handle.addr(), "dalil started");

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");
    handle.shutdown().await;

    Ok(())
}
