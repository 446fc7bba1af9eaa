use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use common_types::ListResponse;
use tracing::{info, instrument};

use crate::{
    blob_store::{BlobStore, StoreError, BLOB_TOKEN_VAR},
    types::AppError,
};

/// Lists every stored photo, newest first
///
/// Fails without touching the store when its credential is missing. Unlike
/// the other endpoints, store failures carry their detail in the message.
///
/// # Errors
///
/// - `500` with the credential message when the store is not configured
/// - `500` with `Failed to fetch image list: <detail>` when the store call fails
#[instrument(skip(store))]
pub async fn list_images(
    Extension(store): Extension<Arc<dyn BlobStore>>,
) -> Result<Json<ListResponse>, AppError> {
    if !store.is_configured() {
        return Err(AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::MissingCredential(BLOB_TOKEN_VAR).to_string(),
        ));
    }

    let mut images = store.list().await.map_err(|err| {
        tracing::error!(error = %err, "List error");
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to fetch image list: {err}"),
        )
    })?;

    images.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

    info!(count = images.len(), "Listed images");

    Ok(Json(ListResponse {
        success: true,
        images,
    }))
}
