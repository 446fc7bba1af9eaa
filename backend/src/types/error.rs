//! Universal error handling for the API

use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::ErrorResponse;

use crate::blob_store::StoreError;

/// Application error rendered as `{"success": false, "error": ...}`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Input validation failure, reported before any store call
    #[must_use]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Store failure surfaced to the caller under a generic message
    ///
    /// The store detail only goes to the log.
    #[must_use]
    pub fn store_failure(err: &StoreError, message: &'static str) -> Self {
        tracing::error!(error = %err, "Blob store operation failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// HTTP status of the error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the caller
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.message),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.message),
            _ => {}
        }

        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl OperationOutput for AppError {
    type Inner = ErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorResponse>::operation_response(ctx, operation)
    }
}
