//! Configuration for the collector/diagram service

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub server: ServerConfig,
    /// Kafka broker list to consume `action-log` from. `None` runs the
    /// demo in-process via `ChannelSource` instead.
    pub kafka_brokers: Option<String>,
    pub kafka_group_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8090 },
            kafka_brokers: None,
            kafka_group_id: "action-monitoring".to_string(),
        }
    }
}

impl MonitoringConfig {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("MONITORING").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
