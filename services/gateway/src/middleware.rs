//! Request middleware binding an `ActionLog` to the request lifecycle
//! (spec.md §4.1, §4.6)

use std::sync::Arc;

use action_logging::{outbound_headers, parse_inbound, InboundHeaders, LogManager, Outcome};
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use services_common::constants::{HEADER_CLIENT, HEADER_CORRELATION_ID, HEADER_REF_ID, HEADER_TRACE};
use tower_http::cors::CorsLayer;

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct ActionLogState {
    pub log_manager: Arc<LogManager>,
    pub app_name: Arc<str>,
}

fn header_str<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Begins an `ActionLog` named after the route, runs the handler, then ends
/// it with the handler's HTTP status translated to a result (spec.md §4.1:
/// "the boundary translates the action's errorCode into an HTTP status" runs
/// in reverse here: a non-2xx status becomes a recorded fault).
///
/// The whole thing runs inside [`LogManager::task_scope`]: `next.run` awaits
/// the body extractor and the handler, and axum's default multi-thread
/// runtime is free to resume this task on a different worker thread once it
/// does. Binding the action with a thread-local instead of a task-local
/// would lose it exactly then.
pub async fn action_log_middleware(State(state): State<ActionLogState>, request: Request, next: Next) -> Response {
    let inbound = InboundHeaders {
        correlation_id: header_str(&request, HEADER_CORRELATION_ID).map(str::to_string),
        ref_id: header_str(&request, HEADER_REF_ID).map(str::to_string),
        client: header_str(&request, HEADER_CLIENT).map(str::to_string),
        trace: header_str(&request, HEADER_TRACE).map(str::to_string),
    };
    let action_name = format!("{} {}", request.method(), request.uri().path());

    LogManager::task_scope(async move {
        state.log_manager.begin(action_name, None, parse_inbound(&inbound));

        let mut response = next.run(request).await;

        let outcome = if response.status().is_success() {
            Outcome::Ok
        } else {
            let message = format!("handler returned status {}", response.status());
            Outcome::Uncaught { type_name: "HttpStatus", message: &message }
        };

        let outbound = state.log_manager.with_current(|log| outbound_headers(log, &state.app_name));
        state.log_manager.end(outcome);

        for (name, value) in outbound {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::from_str(&value)) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    })
    .await
}

/// CORS layer factory, mirroring `services/gateway`'s original configuration
/// surface.
#[must_use]
pub fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_credentials(config.cors.allow_credentials)
        .max_age(std::time::Duration::from_secs(config.cors.max_age_seconds));

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        for origin in &config.cors.allowed_origins {
            if let Ok(value) = HeaderValue::from_str(origin) {
                cors = cors.allow_origin(value);
            }
        }
    }

    if let Ok(methods) = config.cors.allowed_methods.iter().map(|m| m.parse()).collect::<Result<Vec<_>, _>>() {
        cors = cors.allow_methods(methods);
    }
    if let Ok(headers) = config.cors.allowed_headers.iter().map(|h| h.parse()).collect::<Result<Vec<_>, _>>() {
        cors = cors.allow_headers(headers);
    }

    cors
}
