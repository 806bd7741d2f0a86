use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Request-level failures returned to API clients.
///
/// Fetch and analysis failures are not errors at this level: they produce a
/// report whose `error` field is set.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidUrl { message: String, request_id: Uuid },

    #[error("{message}")]
    BadRequest { message: String, request_id: Uuid },

    #[error("{message}")]
    Internal { message: String, request_id: Uuid },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    request_id: Uuid,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl { .. } | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidUrl { .. } => "invalid_url",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            ApiError::InvalidUrl { request_id, .. }
            | ApiError::BadRequest { request_id, .. }
            | ApiError::Internal { request_id, .. } => *request_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(request_id = %self.request_id(), error = %self, "Request failed");
        } else {
            tracing::warn!(request_id = %self.request_id(), error = %self, "Request rejected");
        }

        let body = ErrorBody { error: self.code(), message: self.to_string(), request_id: self.request_id() };
        (status, Json(body)).into_response()
    }
}
