//! Wire types shared between the album backend and its clients
//!
//! Every response carries a `success` flag. Failures are rendered as
//! [`ErrorResponse`] regardless of the endpoint.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One stored photo as reported by the blob store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Public address of the object, unique across the album
    pub url: String,
    /// Storage-relative name
    pub pathname: String,
    /// Size in bytes
    pub size: u64,
    /// Write time assigned by the store
    pub uploaded_at: DateTime<Utc>,
}

/// A file accepted by the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadedImage {
    /// Public address of the new object
    pub url: String,
    /// Generated storage name
    pub pathname: String,
}

/// `GET /api/list`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListResponse {
    pub success: bool,
    /// Newest first
    pub images: Vec<ImageRecord>,
}

/// `POST /api/upload`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub uploaded: Vec<UploadedImage>,
    /// Number of accepted files, always `uploaded.len()`
    pub count: usize,
    /// Number of parts dropped because they were not images
    #[serde(default)]
    pub skipped: usize,
}

/// `DELETE /api/delete` request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, JsonSchema)]
pub struct DeleteRequest {
    /// Urls of the images to remove
    #[serde(default)]
    #[validate(length(min = 1, message = "No images specified for deletion"))]
    pub urls: Vec<String>,
}

/// `DELETE /api/delete`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: usize,
}

/// Failure envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable message
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
