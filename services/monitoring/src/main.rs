//! Collector/diagram service entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use services_common::observability::init_logging;
use tracing::{error, info};

use action_monitoring::{ChannelSource, CollectorIndexer, KafkaSource, MemoryIndex, MonitoringConfig};

#[derive(Parser)]
#[command(name = "monitoring", version, about = "Action log collector and diagram service")]
struct Cli {
    #[arg(short, long, default_value = "config/monitoring")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("monitoring");

    let cli = Cli::parse();
    let config = match MonitoringConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load config, falling back to defaults");
            MonitoringConfig::default()
        }
    };

    let index = Arc::new(MemoryIndex::new());
    let indexer = CollectorIndexer::new(index.clone());

    // Keeps the demo channel's sender alive for the process lifetime so the
    // indexer task doesn't see the source close immediately; a real
    // deployment without Kafka would instead share this sender with an
    // in-process producer (e.g. `services/gateway`).
    let _demo_sender;
    match &config.kafka_brokers {
        Some(brokers) => {
            _demo_sender = None;
            let source = KafkaSource::new(brokers, &config.kafka_group_id, services_common::constants::ACTION_LOG_TOPIC)?;
            tokio::spawn(async move { indexer.run(source).await });
        }
        None => {
            info!("no kafka_brokers configured; collector idle (wire a ChannelSource from the gateway demo to feed it)");
            let (sender, receiver) = tokio::sync::mpsc::channel(1024);
            _demo_sender = Some(sender);
            tokio::spawn(async move { indexer.run(ChannelSource::new(receiver)).await });
        }
    }

    let app = action_monitoring::server::build_router(index);
    let addr = config.server_address();
    info!(%addr, "starting monitoring service");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
