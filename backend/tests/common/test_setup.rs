use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use backend::{
    blob_store::{BlobStore, MemoryBlobStore},
    server,
    types::Environment,
};
use tower::ServiceExt;

use super::utils::{multipart_body, TestFile};

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to an in-memory blob store
pub struct TestSetup {
    pub router: Router,
    pub store: Arc<MemoryBlobStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_store(MemoryBlobStore::new())
    }

    pub fn with_store(store: MemoryBlobStore) -> Self {
        setup_test_env();

        let store = Arc::new(store);
        let dyn_store: Arc<dyn BlobStore> = store.clone();
        let router = server::router(Environment::Development, dyn_store);

        Self { router, store }
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_delete_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_raw_delete_request(route, payload.to_string()).await
    }

    pub async fn send_raw_delete_request(
        &self,
        route: &str,
        body: String,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("DELETE")
            .header("Content-Type", "application/json")
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_upload_request(
        &self,
        files: &[TestFile],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let (content_type, body) = multipart_body(files);
        let request = Request::builder()
            .uri("/api/upload")
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
