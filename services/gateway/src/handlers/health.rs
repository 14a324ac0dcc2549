//! Health and metrics endpoints, excluded from action logging
//! (spec.md §4.1 "public endpoints" analogue)

use axum::extract::State;
use axum::Json;

use crate::models::{ApiResponse, HealthCheckResponse};
use crate::server::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthCheckResponse>> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        forwarder_dropped: state.forwarder.dropped_count(),
    };
    Json(ApiResponse::success(response))
}

pub async fn metrics(State(state): State<AppState>) -> String {
    format!(
        "# HELP gateway_forwarder_dropped_total Documents dropped from the forward queue\n\
         # TYPE gateway_forwarder_dropped_total counter\n\
         gateway_forwarder_dropped_total {}\n",
        state.forwarder.dropped_count()
    )
}
