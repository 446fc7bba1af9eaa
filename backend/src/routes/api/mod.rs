pub mod delete;
pub mod list;
pub mod upload;

use aide::axum::{routing, ApiRouter};
use axum::extract::DefaultBodyLimit;

/// Largest accepted upload request body
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Gateway routes forwarding to the blob store
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/api/list", routing::get(list::list_images))
        .route(
            "/api/upload",
            axum::routing::post(upload::upload_images)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .api_route("/api/delete", routing::delete(delete::delete_images))
}
