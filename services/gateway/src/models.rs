//! REST API models for the demo endpoints

use serde::{Deserialize, Serialize};

/// Generic API response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, timestamp: chrono::Utc::now().timestamp() }
    }

    #[must_use]
    pub fn error(message: String) -> Self {
        Self { success: false, data: None, error: Some(message), timestamp: chrono::Utc::now().timestamp() }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub forwarder_dropped: u64,
}

/// Request body for the `POST /greet` demo handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct GreetRequest {
    pub name: String,
}

/// Response body for the `POST /greet` demo handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct GreetResponse {
    pub message: String,
}
