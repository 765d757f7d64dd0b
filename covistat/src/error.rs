// covistat/src/error.rs

//! HTTP error responses for the dashboard endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use covistat_core::CovistatError;
use serde::Serialize;

/// JSON error body, `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// HTTP error response: a status code plus the JSON body.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl AppError {
    /// 400 for rejected user input (missing file, bad extension, ...).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
            },
        }
    }

    /// 500 for pipeline or storage failures.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: message.into(),
            },
        }
    }
}

/// Pipeline failures surface as a 500 with their message; they never
/// terminate the serving process.
impl From<CovistatError> for AppError {
    fn from(err: CovistatError) -> Self {
        AppError::internal(format!("Analysis failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status.as_u16(),
                message = %self.body.error,
                "Server error response"
            );
        } else if self.status.is_client_error() {
            tracing::warn!(
                status = %self.status.as_u16(),
                message = %self.body.error,
                "Client error response"
            );
        }

        let body = serde_json::to_string(&self.body)
            .unwrap_or_else(|_| r#"{"error":"internal serialization error"}"#.to_string());
        (
            self.status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.body.error)
    }
}

impl std::error::Error for AppError {}
