//! End-to-end checks that a request produces a correctly correlated
//! response and the demo handler's context lands in the emitted document.

use action_gateway::{GatewayConfig, GatewayServer};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use services_common::constants::{HEADER_CORRELATION_ID, HEADER_REF_ID};
use tower::ServiceExt;

fn app() -> axum::Router {
    GatewayServer::new(GatewayConfig::default()).create_app().unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn greet_emits_correlation_headers() {
    let request = Request::builder()
        .method("POST")
        .uri("/greet")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"ada"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(HEADER_CORRELATION_ID));
    assert!(response.headers().contains_key(HEADER_REF_ID));
}

#[tokio::test]
async fn greet_rejects_blank_name() {
    let request = Request::builder()
        .method("POST")
        .uri("/greet")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":""}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
