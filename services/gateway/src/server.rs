//! Gateway HTTP server: wires `LogManager` into the axum router
//! (spec.md §4.1, §4.6)

use std::sync::Arc;
use std::time::Instant;

use action_logging::{ChannelTransport, KafkaTransport, LogFilter, LogManager, RecordForwarder, Transport};
use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use services_common::constants::ACTION_LOG_TOPIC;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::handlers::{greet, health_check, metrics};
use crate::middleware::{action_log_middleware, create_cors_layer, ActionLogState};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub log_manager: Arc<LogManager>,
    pub forwarder: Arc<RecordForwarder>,
    pub start_time: Instant,
}

pub struct GatewayServer {
    config: GatewayConfig,
    start_time: Instant,
}

impl GatewayServer {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self { config, start_time: Instant::now() }
    }

    fn build_forwarder(&self) -> Result<Arc<RecordForwarder>> {
        let transport: Arc<dyn Transport> = match &self.config.kafka_brokers {
            Some(brokers) => {
                info!(brokers, "using Kafka transport for action log forwarding");
                Arc::new(KafkaTransport::new(brokers, ACTION_LOG_TOPIC)?)
            }
            None => {
                info!("no kafka_brokers configured; using in-process channel transport");
                let (transport, _receiver) = ChannelTransport::new(self.config.log_manager.forward_queue_capacity);
                Arc::new(transport)
            }
        };
        Ok(Arc::new(RecordForwarder::new(self.config.log_manager.forward_queue_capacity, transport)))
    }

    pub fn create_app(&self) -> Result<Router> {
        let (app, _forwarder) = self.create_app_with_forwarder()?;
        Ok(app)
    }

    fn create_app_with_forwarder(&self) -> Result<(Router, Arc<RecordForwarder>)> {
        let forwarder = self.build_forwarder()?;
        let log_manager = Arc::new(LogManager::new(
            self.config.app_name.clone(),
            hostname(),
            self.config.log_manager.clone(),
            LogFilter::default(),
            Arc::clone(&forwarder),
        ));

        let app_state = AppState { log_manager: Arc::clone(&log_manager), forwarder: Arc::clone(&forwarder), start_time: self.start_time };
        let action_log_state = ActionLogState { log_manager, app_name: self.config.app_name.clone().into() };

        let app = Router::new()
            .route("/greet", post(greet))
            .route_layer(middleware::from_fn_with_state(action_log_state, action_log_middleware))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .with_state(app_state)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TimeoutLayer::new(std::time::Duration::from_secs(self.config.server.timeout_seconds)))
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config));

        Ok((app, forwarder))
    }

    pub async fn start(self) -> Result<()> {
        let addr = self.config.server_address();
        let (app, forwarder) = self.create_app_with_forwarder()?;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                interval.tick().await;
                forwarder.flush().await;
            }
        });

        info!("starting gateway on {}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}
