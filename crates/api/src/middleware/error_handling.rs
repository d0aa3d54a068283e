//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error responses so the
//! whole API fails the same way. There are only two kinds of failure a
//! client sees: a validation problem (rejected before any store call) or a
//! store problem (surfaced once, never retried).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use manege_core::errors::ManegeError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific [`ManegeError`] instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub ManegeError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ManegeError::NotFound(_) => StatusCode::NOT_FOUND,
            ManegeError::Validation(_) => StatusCode::BAD_REQUEST,
            ManegeError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ManegeError::Authorization(_) => StatusCode::FORBIDDEN,
            ManegeError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ManegeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Maps a domain error straight to its HTTP response.
pub fn map_error(err: ManegeError) -> Response {
    AppError(err).into_response()
}

/// Automatic conversion from ManegeError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, ManegeError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<ManegeError> for AppError {
    fn from(err: ManegeError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the eyre error in a `ManegeError::Database` variant so repository
/// failures propagate through handlers with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ManegeError::Database(err))
    }
}
