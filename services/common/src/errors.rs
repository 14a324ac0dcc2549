//! Error taxonomy shared across the action-logging platform
//!
//! spec.md §7 names four kinds of action failure (User-fault, System-fault,
//! Internal-fault, Warning). `ActionFault` is that taxonomy as a typed enum;
//! `AppError` is the thin axum-facing wrapper that knows how to translate a
//! fault's error code into an HTTP status, per spec.md §7's closing line
//! ("the boundary translates the action's errorCode into an HTTP status").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::constants::{ERROR_CODE_INTERNAL, ERROR_CODE_REMOTE_SERVICE};

/// One of the four action failure kinds from spec.md §7.
#[derive(Debug, Error)]
pub enum ActionFault {
    /// Validation failure, not-found, forbidden. Caller's fault.
    #[error("{message}")]
    UserFault { code: String, message: String },

    /// I/O failure talking to a downstream dependency.
    #[error("{message}")]
    SystemFault { code: String, message: String },

    /// Programming error: null where forbidden, illegal state.
    #[error("{message}")]
    InternalFault { message: String },

    /// Recoverable anomaly that should only ever escalate result to WARN.
    #[error("{message}")]
    Warning { message: String },
}

impl ActionFault {
    /// Not-found user fault with the conventional `NOT_FOUND` code.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::UserFault { code: "NOT_FOUND".to_string(), message: message.into() }
    }

    /// Validation user fault with the conventional `VALIDATION_ERROR` code.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::UserFault { code: "VALIDATION_ERROR".to_string(), message: message.into() }
    }

    /// System fault defaulting to `REMOTE_SERVICE_ERROR` when no more
    /// specific dependency code is available.
    #[must_use]
    pub fn remote_service(message: impl Into<String>) -> Self {
        Self::SystemFault { code: ERROR_CODE_REMOTE_SERVICE.to_string(), message: message.into() }
    }

    /// The short token recorded as `ActionLog.errorCode`.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UserFault { code, .. } | Self::SystemFault { code, .. } => code,
            Self::InternalFault { .. } => ERROR_CODE_INTERNAL,
            Self::Warning { .. } => "UNASSIGNED",
        }
    }

    /// `true` for faults that must escalate `ActionLog.result` to `ERROR`
    /// rather than `WARN`.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Warning { .. })
    }
}

/// Axum-facing wrapper around [`ActionFault`] that knows its HTTP status.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub ActionFault);

#[derive(Serialize)]
struct ErrorBody<'a> {
    error_code: &'a str,
    message: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ActionFault::UserFault { code, .. } => match code.as_str() {
                "NOT_FOUND" => StatusCode::NOT_FOUND,
                "FORBIDDEN" => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_REQUEST,
            },
            ActionFault::SystemFault { .. } => StatusCode::BAD_GATEWAY,
            ActionFault::InternalFault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ActionFault::Warning { .. } => StatusCode::OK,
        };
        let message = self.0.to_string();
        let body = ErrorBody { error_code: self.0.code(), message: &message };
        (status, axum::Json(body)).into_response()
    }
}
