//! General-purpose test helpers shared across integration suites

use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep, timeout};
use tracing_subscriber::EnvFilter;

/// Initializes a test-scoped `tracing` subscriber. Safe to call from every
/// test; repeated calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

/// Polls `condition` until it returns `true` or `timeout_duration` elapses.
/// Used by collector tests waiting for an async indexer task to catch up.
pub async fn wait_for<F, Fut>(condition: F, timeout_duration: Duration, poll_interval: Duration) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    timeout(timeout_duration, async {
        loop {
            if condition().await {
                return;
            }
            sleep(poll_interval).await;
        }
    })
    .await
    .map_err(|_| anyhow::anyhow!("timeout waiting for condition"))
}

/// Wraps `future` with a test timeout, turning a hang into a clear failure
/// instead of the test runner's own (less specific) timeout.
pub async fn with_timeout<T>(duration: Duration, future: impl std::future::Future<Output = T>) -> Result<T> {
    timeout(duration, future).await.map_err(|_| anyhow::anyhow!("test timeout after {:?}", duration))
}

/// Generates a deterministic, spec-shaped (24 lowercase hex chars) action id
/// from a small integer seed, for tests that need stable ids across
/// assertions instead of `services_common::ids::new_action_id`'s random ones.
#[must_use]
pub fn seeded_action_id(seed: u64) -> String {
    format!("{seed:024x}")
}
