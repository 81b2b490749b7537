//! Gateway error taxonomy.
//!
//! [`GatewayError`] is what the chat core and the HTTP handlers surface. Storage and
//! bootstrap code works in `anyhow::Result` and is folded into [`GatewayError::Storage`]
//! at the handler boundary. Every variant renders as `{"detail": "..."}` with a
//! matching HTTP status.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Requested application is not on the launch allow-list for this platform.
    #[error("{0}")]
    ToolNotAllowed(String),

    /// The allow-listed process could not be started.
    #[error("{0}")]
    ToolExecutionFailed(String),

    /// Connection failure, non-success status, or timeout talking to the model server.
    #[error("inference transport error: {0}")]
    InferenceTransport(String),

    /// The model server answered with a stream we could not make sense of.
    #[error("inference protocol error: {0}")]
    InferenceProtocol(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Well-formed JSON whose shape does not match the endpoint's body type.
    #[error("{0}")]
    Unprocessable(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ToolNotAllowed(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InferenceTransport(_) | Self::InferenceProtocol(_) => StatusCode::BAD_GATEWAY,
            Self::ToolExecutionFailed(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }
        let body = serde_json::json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for GatewayError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Storage(anyhow::anyhow!("db task failed: {e}"))
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => Self::Unprocessable(rejection.body_text()),
            _ => Self::BadRequest(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
