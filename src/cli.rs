use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sdash")]
#[command(about = "Status console for the local-dev service dashboard")]
pub struct Cli {
    /// Dashboard base URL (defaults to $SDASH_DASHBOARD_URL, then http://localhost:4280)
    #[arg(long)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show service status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Keep watching: poll the service list and follow the health stream
        #[arg(short, long)]
        watch: bool,
    },
    /// Start a service (all services when omitted)
    Start {
        /// Service to start
        service: Option<String>,
    },
    /// Stop a service (all services when omitted)
    Stop {
        /// Service to stop
        service: Option<String>,
    },
    /// Restart a service (all services when omitted)
    Restart {
        /// Service to restart
        service: Option<String>,
    },
}
