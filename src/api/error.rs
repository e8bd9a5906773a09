//! Maps catalog errors onto HTTP responses.
//!
//! Bodies follow `{"detail": "..."}`. Server-side failures are logged in full
//! and answered with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub detail: String,
}

/// Status code for an error.
#[must_use]
pub const fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::ReferenceNotFound { .. } => StatusCode::BAD_REQUEST,
        Error::UniquenessViolation { .. } => StatusCode::CONFLICT,
        Error::InvalidArgument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let detail = if self.is_client_error() {
            debug!(%status, error = %self, "Request rejected");
            self.to_string()
        } else {
            error!(%status, error = %self, "Request failed");
            "internal server error".to_string()
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
