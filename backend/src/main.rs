use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use backend::{
    blob_store::{BlobStore, S3BlobStore, VercelBlobStore},
    server,
    types::{BlobBackend, Environment},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

async fn blob_store(environment: &Environment) -> Arc<dyn BlobStore> {
    match environment.blob_backend() {
        BlobBackend::Vercel => {
            let token = environment.blob_read_write_token();
            if token.is_none() {
                warn!("BLOB_READ_WRITE_TOKEN is not set, every store call will fail");
            }
            Arc::new(VercelBlobStore::new(environment.blob_api_url(), token))
        }
        BlobBackend::S3 => {
            let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
            Arc::new(S3BlobStore::new(
                s3_client,
                environment.s3_bucket(),
                &environment.public_base_url(),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Configure logging format based on environment
    // Use JSON format for staging/production (Datadog), regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let store = blob_store(&environment).await;
    info!(
        environment = %environment,
        backend = %environment.blob_backend(),
        "✅ Initialized blob store"
    );

    server::start(environment, store).await
}
