//! Configuration for the action-logging HTTP boundary

use anyhow::Result;
use serde::{Deserialize, Serialize};
use services_common::LogManagerConfig;

/// Gateway configuration: the HTTP server plus the `LogManager` it wires
/// into every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Application identity recorded on every `ActionDocument` emitted from
    /// this process (spec.md §3 `app`).
    pub app_name: String,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub log_manager: LogManagerConfig,
    /// Kafka broker list for `KafkaTransport`. When absent, the in-process
    /// `ChannelTransport` is used instead (demo / test mode).
    pub kafka_brokers: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            app_name: "gateway".to_string(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                timeout_seconds: 30,
                max_body_size: 1024 * 1024,
            },
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec!["*".to_string()],
                allowed_methods: vec![
                    "GET".to_string(),
                    "POST".to_string(),
                    "OPTIONS".to_string(),
                ],
                allowed_headers: vec!["Content-Type".to_string(), "X-Correlation-Id".to_string()],
                allow_credentials: false,
                max_age_seconds: 86400,
            },
            log_manager: LogManagerConfig::default(),
            kafka_brokers: None,
        }
    }
}

impl GatewayConfig {
    /// Layered load: defaults, then `config/gateway.toml` if present, then
    /// `GATEWAY_*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
