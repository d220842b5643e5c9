mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use output::CliOutput;
use service_dashboard::{DashboardConfig, Error as DashError, OperationKind};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        if let Some(dash_error) = e.downcast_ref::<DashError>() {
            eprintln!("Error: {}", dash_error);
            if let Some(suggestion) = dash_error.suggestion() {
                eprintln!("\nHint: {}", suggestion);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::resolve(cli.url)?;
    let out = CliOutput;

    match cli.command {
        Commands::Status { json, watch } => {
            commands::run_status(&config, json, watch, &out).await
        }
        Commands::Start { service } => {
            commands::run_lifecycle(&config, OperationKind::Start, service, &out).await
        }
        Commands::Stop { service } => {
            commands::run_lifecycle(&config, OperationKind::Stop, service, &out).await
        }
        Commands::Restart { service } => {
            commands::run_lifecycle(&config, OperationKind::Restart, service, &out).await
        }
    }
}
