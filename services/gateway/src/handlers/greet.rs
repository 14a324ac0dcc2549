//! A minimal handler showing the calls an application makes against the
//! action bound by [`crate::middleware::action_log_middleware`] (spec.md
//! §4.1: "context/stat/track calls from handlers")

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{ApiResponse, GreetRequest, GreetResponse};
use crate::server::AppState;

pub async fn greet(
    State(state): State<AppState>,
    Json(request): Json<GreetRequest>,
) -> Result<Json<ApiResponse<GreetResponse>>, StatusCode> {
    if request.name.trim().is_empty() {
        state.log_manager.context("validationError", "name must not be empty");
        return Err(StatusCode::BAD_REQUEST);
    }

    state.log_manager.context("name", request.name.clone());
    state.log_manager.stat("greet.count", 1.0);

    let started = Instant::now();
    let message = format!("hello, {}", request.name);
    state.log_manager.track("render", started.elapsed().as_nanos() as u64, 0, 1);

    Ok(Json(ApiResponse::success(GreetResponse { message })))
}
