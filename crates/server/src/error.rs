//! HTTP error responses.
//!
//! Every search failure becomes a 400 with `{"status":"error","error":<code>}`.
//! Dataset driver messages are logged here and never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cityfind_core::SearchError;
use serde::Serialize;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub error: &'static str,
}

impl ErrorBody {
    pub fn new(code: &'static str) -> Self {
        Self { status: "error", error: code }
    }
}

/// A search failure on its way out as an HTTP response.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub SearchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            SearchError::DatasetUnavailable(msg) => tracing::error!(error = %msg, "dataset unavailable"),
            SearchError::SerializationFailure(msg) => tracing::error!(error = %msg, "response encoding failed"),
            other => tracing::debug!(code = other.code(), "rejected search"),
        }

        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(self.0.code()))).into_response()
    }
}
