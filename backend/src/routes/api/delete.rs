use std::sync::Arc;

use axum::{Extension, Json};
use common_types::{DeleteRequest, DeleteResponse};
use tracing::{info, instrument};

use crate::{
    blob_store::BlobStore,
    types::{AppError, ValidatedJson},
};

const DELETE_FAILED: &str = "Delete failed";

/// Deletes the named photos in one batched store call
///
/// Urls that no longer exist are counted like any other: the store does not
/// tell an absent key apart from a removed one.
///
/// # Errors
///
/// - `400` when `urls` is missing or empty
/// - `500` with a generic message when the store call fails
#[instrument(skip(store, payload), fields(count = payload.urls.len()))]
pub async fn delete_images(
    Extension(store): Extension<Arc<dyn BlobStore>>,
    ValidatedJson(payload): ValidatedJson<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    store
        .delete(&payload.urls)
        .await
        .map_err(|err| AppError::store_failure(&err, DELETE_FAILED))?;

    info!("Deleted images");

    Ok(Json(DeleteResponse {
        success: true,
        deleted: payload.urls.len(),
    }))
}
