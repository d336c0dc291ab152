mod cli;
mod commands;
mod observability;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use medrec_config::settings::loader::load_config;
use medrec_config::names::GP_LOG_LEVEL;
use medrec_services::MedrecSystem;

use cli::{Cli, Commands};
use observability::{apply_logging_level, init_tracing_with_level, start_log_level_watcher};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing_with_level(&config.logging.level);

    let system = MedrecSystem::bootstrap(&config).context("failed to initialize services")?;
    let _log_watcher =
        start_log_level_watcher(system.properties.subscribe(), config.logging.level.clone());
    if let Some(level) = system
        .properties
        .get(GP_LOG_LEVEL)
        .await?
        .and_then(|p| p.value)
    {
        apply_logging_level(&level);
    }

    match &cli.command {
        Commands::Operations => commands::operations::list(&system, format)?,
        Commands::Check(args) => commands::check::check(&system, args, format)?,
        Commands::ResolveVisitType(args) => {
            commands::visits::resolve_visit_type(&system, args, format).await?;
        }
        Commands::AssignVisit(args) => {
            commands::visits::assign_visit(&system, args, format).await?;
        }
    }

    Ok(())
}
