use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_events::RunnerError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent `{"error", "code"}`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Triggering the producer task failed.
    #[error("Failed to start stream: {0}")]
    ProducerUnavailable(#[source] RunnerError),

    /// Opening the stream for a run failed before any data was sent.
    #[error("Failed to subscribe to stream: {0}")]
    SubscribeFailed(#[source] RunnerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::ProducerUnavailable(err) => {
                tracing::error!(error = %err, "Error starting stream");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PRODUCER_UNAVAILABLE",
                    self.to_string(),
                )
            }
            AppError::SubscribeFailed(err) => {
                tracing::error!(error = %err, "Error subscribing to stream");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SUBSCRIBE_FAILED",
                    self.to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
