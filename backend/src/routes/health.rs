use std::sync::Arc;

use aide::axum::IntoApiResponse;
use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;

use crate::blob_store::BlobStore;

#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    status: String,
    /// Current version of the application
    semver: String,
    /// Commit hash of the current build (if available)
    rev: Option<String>,
    /// Whether the blob store credential is present
    blob_store_configured: bool,
}

/// Health check endpoint
///
/// Returns the current status and version information of the service.
/// A missing blob store credential does not make the service unhealthy; it is
/// reported so deployments can spot it before the first list call fails.
pub async fn handler(Extension(store): Extension<Arc<dyn BlobStore>>) -> impl IntoApiResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        semver: env!("CARGO_PKG_VERSION").to_string(),
        rev: option_env!("GIT_REV").map(ToString::to_string),
        blob_store_configured: store.is_configured(),
    })
}
