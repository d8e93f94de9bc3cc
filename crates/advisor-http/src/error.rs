use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be forwarded to the administrator.
    #[error("forwarding failed: {0}")]
    Forwarding(#[from] advisor_core::Error),

    /// The detached analyze task panicked.
    #[error("analyze task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "analyze request failed");
        // Callers only ever learn the outcome, never the cause.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false })),
        )
            .into_response()
    }
}
