//! Request extractors whose failures answer with the `{"detail"}` body.
//!
//! axum's own `Json` and `Path` reject malformed input with a plain-text body;
//! these wrappers keep axum's status code and reuse [`ErrorBody`].

use super::error::ErrorBody;
use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RequestRejection))]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RequestRejection))]
pub struct PathParam<T>(pub T);

/// A request that could not be parsed into a handler's input.
#[derive(Debug)]
pub struct RequestRejection {
    status: StatusCode,
    detail: String,
}

impl From<JsonRejection> for RequestRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RequestRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        debug!(status = %self.status, detail = %self.detail, "Malformed request");
        (
            self.status,
            axum::Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}
