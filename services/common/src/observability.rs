//! Process-wide `tracing` setup shared by every binary in the workspace.
//!
//! Mirrors the original logging service's `init_logging`: a JSON layer for
//! production, a pretty layer for development, and an `EnvFilter` that
//! defaults to `info` but always honors `RUST_LOG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global `tracing` subscriber for `service_name`. Safe to
/// call more than once per process (later calls are no-ops) so tests and
/// `main` can both call it unconditionally.
pub fn init_logging(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let is_production =
        std::env::var("ACTIONLOG_ENV").map(|e| e == "production").unwrap_or(false);

    let result = if is_production {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry().with(filter).with(json_layer).try_init()
    } else {
        let console_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry().with(filter).with(console_layer).try_init()
    };

    if result.is_ok() {
        tracing::info!(service = service_name, version = env!("CARGO_PKG_VERSION"), "service initialized");
    }
}
