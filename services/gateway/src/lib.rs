//! HTTP boundary demonstrating `LogManager` wired into an axum request
//! pipeline: begin/end per request, correlation headers in and out,
//! `context`/`stat`/`track` calls from a handler

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;

pub use config::GatewayConfig;
pub use server::GatewayServer;

use anyhow::Result;

pub async fn start_server(config: GatewayConfig) -> Result<()> {
    GatewayServer::new(config).start().await
}
