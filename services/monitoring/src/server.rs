//! Collector HTTP surface: `GET /diagram/arch`, `GET /diagram/action/{id}`
//! (spec.md §6)

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::diagram::{DiagramBuilder, DiagramError};
use crate::index::Index;

#[derive(Clone)]
pub struct AppState {
    pub diagrams: Arc<DiagramBuilder>,
}

#[derive(Debug, Deserialize)]
pub struct ArchQuery {
    #[serde(default = "default_hours")]
    pub hours: i64,
    #[serde(default)]
    pub exclude: Option<String>,
}

fn default_hours() -> i64 {
    24
}

const GRAPHVIZ_CONTENT_TYPE: &str = "text/vnd.graphviz";

async fn arch_diagram(State(state): State<AppState>, Query(query): Query<ArchQuery>) -> Response {
    let exclude: Vec<String> = query.exclude.map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()).unwrap_or_default();
    let dot = state.diagrams.arch(query.hours, &exclude).await;
    ([(axum::http::header::CONTENT_TYPE, GRAPHVIZ_CONTENT_TYPE)], dot).into_response()
}

async fn action_diagram(State(state): State<AppState>, Path(action_id): Path<String>) -> Response {
    match state.diagrams.action(&action_id).await {
        Ok(dot) => ([(axum::http::header::CONTENT_TYPE, GRAPHVIZ_CONTENT_TYPE)], dot).into_response(),
        Err(DiagramError::NotFound(id)) => (StatusCode::NOT_FOUND, format!("unknown action id: {id}")).into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}

#[must_use]
pub fn build_router(index: Arc<dyn Index>) -> Router {
    let state = AppState { diagrams: Arc::new(DiagramBuilder::new(index)) };
    Router::new()
        .route("/health", get(health))
        .route("/diagram/arch", get(arch_diagram))
        .route("/diagram/action/:id", get(action_diagram))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
