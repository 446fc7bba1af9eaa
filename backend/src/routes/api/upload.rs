use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart,
    },
    Extension, Json,
};
use bytes::Bytes;
use common_types::{UploadResponse, UploadedImage};
use tracing::{debug, info, instrument, warn};

use crate::{
    blob_store::{BlobStore, PutOptions},
    pathname,
    types::AppError,
};

/// Multipart field carrying the files
pub const FILES_FIELD: &str = "files";

const NO_FILES: &str = "No files selected";
const INVALID_MULTIPART: &str = "Invalid multipart payload";
const UPLOAD_FAILED: &str = "Upload failed";

/// One `files` part as received
struct IncomingFile {
    file_name: Option<String>,
    content_type: Option<String>,
    body: Bytes,
}

impl IncomingFile {
    async fn read(field: Field<'_>) -> Result<Self, AppError> {
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let body = field.bytes().await.map_err(|err| {
            warn!(error = %err, "Failed to read multipart field");
            AppError::bad_request(INVALID_MULTIPART)
        })?;

        Ok(Self {
            file_name,
            content_type,
            body,
        })
    }

    /// Declared content type, if it names an image
    fn image_content_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|raw| raw.parse::<mime::Mime>().ok())
            .filter(|parsed| parsed.type_() == mime::IMAGE)
            .map(|parsed| parsed.essence_str().to_string())
    }
}

async fn collect_files(multipart: &mut Multipart) -> Result<Vec<IncomingFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        warn!(error = %err, "Malformed multipart body");
        AppError::bad_request(INVALID_MULTIPART)
    })? {
        if field.name() != Some(FILES_FIELD) {
            debug!(field = ?field.name(), "Ignoring unknown multipart field");
            continue;
        }
        files.push(IncomingFile::read(field).await?);
    }

    Ok(files)
}

/// Stores every image part of the `files` field under a generated name
///
/// Parts that are not declared as images are dropped without an error and
/// only show up in `skipped`. Writes happen one by one and are not undone
/// when a later one fails.
///
/// # Errors
///
/// - `400` when no `files` part is present or the body is not valid multipart
/// - `500` with a generic message when a store write fails
#[instrument(skip(store, multipart))]
pub async fn upload_images(
    Extension(store): Extension<Arc<dyn BlobStore>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|err| {
        warn!(error = %err, "Request is not multipart");
        AppError::bad_request(INVALID_MULTIPART)
    })?;

    let files = collect_files(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::bad_request(NO_FILES));
    }

    let mut uploaded = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for file in files {
        let Some(content_type) = file.image_content_type() else {
            debug!(
                file_name = ?file.file_name,
                content_type = ?file.content_type,
                "Skipping non-image file"
            );
            skipped += 1;
            continue;
        };

        let pathname = pathname::generate(file.file_name.as_deref());
        let put = store
            .put(&pathname, file.body, PutOptions::public(content_type))
            .await
            .map_err(|err| AppError::store_failure(&err, UPLOAD_FAILED))?;

        debug!(url = %put.url, "Stored image");
        uploaded.push(UploadedImage {
            url: put.url,
            pathname: put.pathname,
        });
    }

    info!(count = uploaded.len(), skipped, "Upload complete");

    Ok(Json(UploadResponse {
        success: true,
        count: uploaded.len(),
        uploaded,
        skipped,
    }))
}
