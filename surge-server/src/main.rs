//! Surge server binary
//!
//! Load test orchestrator serving a REST API over a persisted run record
//! store and an external load-generating workload.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use surge_config::{ConfigLoader, SurgeConfig};
use surge_server::{init_logging, Server};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Workload program to launch per run
    #[arg(long)]
    workload: Option<String>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", SurgeConfig::generate_sample());
        return Ok(());
    }

    let loader = ConfigLoader::new();
    let mut config = loader.load(cli.config.as_ref())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate_all()?;

    init_logging(&config)?;

    let server = Server::new(config).await?;
    server.start().await
}

/// CLI arguments win over file and environment configuration
fn apply_cli_overrides(config: &mut SurgeConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }
    if let Some(workload) = &cli.workload {
        config.loadtest.workload.program = workload.clone();
    }
}
