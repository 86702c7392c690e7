//! HTTP error responses for the datemark server.
//!
//! Every failed query is a 500 with a `{code, message}` body; no partial
//! counts are ever returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error body returned by the HTTP surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code (e.g. `STORE_RATE_LIMITED`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<datemark_core::Error> for ApiError {
    fn from(err: datemark_core::Error) -> Self {
        Self { code: err.code().to_string(), message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(code = %self.code, message = %self.message, "query failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
