//! Error-to-HTTP response conversion.
//!
//! Two wrappers over [`crate::error::Error`]: [`ApiError`] renders the
//! `{error, code}` body used by the read-only endpoints, [`UploadError`]
//! renders the validation response shape so upload callers always get
//! `{valid: false, ...}`.

use crate::error::{Error, INTERNAL_ERROR_MESSAGE};
use crate::server::routes_api::ValidationResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::any::Any;

fn status_of(err: &Error) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_server_error(status: StatusCode, err: &Error) {
    if status.is_server_error() {
        tracing::error!(status = %status, code = err.code(), error = %err, "Server error in API handler");
    }
}

/// Error body for JSON endpoints other than the upload.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        log_server_error(status, &self.0);

        let body = json!({
            "error": self.0.user_message(),
            "code": self.0.code(),
        });
        (status, Json(body)).into_response()
    }
}

/// Error body for `POST /api/validate-video`.
#[derive(Debug)]
pub struct UploadError(pub Error);

impl<E: Into<Error>> From<E> for UploadError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        log_server_error(status, &self.0);
        if status.is_client_error() {
            tracing::warn!(code = self.0.code(), error = %self.0, "Upload rejected");
        }

        (status, Json(ValidationResponse::failure(self.0.user_message()))).into_response()
    }
}

/// Turn a handler panic into the generic 500 validation body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ValidationResponse::failure(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
