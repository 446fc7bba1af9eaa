//! Blob store client used by the gateway handlers
//!
//! The album never touches object bytes after writing them: it lists, puts and
//! deletes through the [`BlobStore`] trait. [`VercelBlobStore`] speaks the
//! hosted blob HTTP API, [`S3BlobStore`] maps the same contract onto a bucket.
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;
mod vercel;

use async_trait::async_trait;
use bytes::Bytes;
use common_types::ImageRecord;

pub use error::{StoreError, StoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;
pub use vercel::VercelBlobStore;

/// Name of the credential the hosted blob API requires
pub const BLOB_TOKEN_VAR: &str = "BLOB_READ_WRITE_TOKEN";

/// Options applied to a single put
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// Content type recorded on the object
    pub content_type: String,
    /// Make the object readable without credentials
    pub public: bool,
    /// Let the store append its own suffix to the pathname
    pub add_random_suffix: bool,
}

impl PutOptions {
    /// Public object stored under exactly the given pathname
    #[must_use]
    pub fn public(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            public: true,
            add_random_suffix: false,
        }
    }
}

/// Result of a successful put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResult {
    /// Public address of the written object
    pub url: String,
    /// Pathname the object was stored under
    pub pathname: String,
}

/// Managed key-object store
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether the credential needed to reach the store is present
    fn is_configured(&self) -> bool;

    /// Lists every object in the store, in no particular order
    async fn list(&self) -> StoreResult<Vec<ImageRecord>>;

    /// Writes one object
    async fn put(&self, pathname: &str, body: Bytes, options: PutOptions)
        -> StoreResult<PutResult>;

    /// Deletes the objects behind the given urls in one batch
    ///
    /// Urls that do not exist are not reported.
    async fn delete(&self, urls: &[String]) -> StoreResult<()>;
}
