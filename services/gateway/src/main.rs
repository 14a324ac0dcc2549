//! Gateway entry point

use anyhow::Result;
use clap::Parser;
use services_common::observability::init_logging;
use tracing::{error, info};

use action_gateway::{start_server, GatewayConfig};

#[derive(Parser)]
#[command(name = "gateway", version, about = "Action logging demo gateway")]
struct Cli {
    /// Configuration file path (without extension), searched relative to cwd
    #[arg(short, long, default_value = "config/gateway")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("gateway");

    let cli = Cli::parse();
    let config = match GatewayConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load config, falling back to defaults");
            GatewayConfig::default()
        }
    };

    info!(address = %config.server_address(), app = %config.app_name, "starting gateway");

    if let Err(e) = start_server(config).await {
        error!(error = %e, "gateway terminated with an error");
        std::process::exit(1);
    }

    Ok(())
}
