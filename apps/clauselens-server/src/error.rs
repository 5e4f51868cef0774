//! Error types for the ClauseLens server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doc_extract::ExtractError;
use ml_gateway::GatewayError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Extraction(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] GatewayError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Extraction(_) | ApiError::Upstream(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(_) => ApiError::UnsupportedFormat(err.to_string()),
            other => ApiError::Extraction(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {}", err))
    }
}

/// An [`ApiError`] bound to the request it failed. Rendered as
/// `{"error": .., "requestId": ..}`.
#[derive(Debug)]
pub struct ErrorReply {
    pub request_id: String,
    pub error: ApiError,
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        let status = self.error.status();
        let message = self.error.to_string();

        if status.is_server_error() {
            tracing::error!(request_id = %self.request_id, status = status.as_u16(), "{}", message);
        } else {
            tracing::warn!(request_id = %self.request_id, status = status.as_u16(), "{}", message);
        }

        let body = Json(json!({
            "error": message,
            "requestId": self.request_id,
        }));

        (status, body).into_response()
    }
}
