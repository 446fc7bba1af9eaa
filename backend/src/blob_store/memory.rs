//! In-process blob store for tests

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common_types::ImageRecord;
use tokio::sync::RwLock;

use super::{BlobStore, PutOptions, PutResult, StoreError, StoreResult, BLOB_TOKEN_VAR};

const BASE_URL: &str = "https://blob.test";

#[derive(Debug, Clone)]
struct StoredObject {
    record: ImageRecord,
    content_type: String,
    body: Bytes,
}

/// Blob store keeping objects in memory
///
/// Can be built unconfigured to simulate a missing credential, and can be
/// told to fail every call to simulate an unreachable store.
#[derive(Debug)]
pub struct MemoryBlobStore {
    objects: RwLock<Vec<StoredObject>>,
    configured: bool,
    failing: bool,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    /// Empty, configured store
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            configured: true,
            failing: false,
        }
    }

    /// Store whose credential is absent
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            configured: false,
            failing: false,
        }
    }

    /// Store whose every operation fails with an upstream error
    #[must_use]
    pub fn failing() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            configured: true,
            failing: true,
        }
    }

    /// Seeds an object with an explicit write time
    pub async fn insert_at(
        &self,
        pathname: &str,
        body: &[u8],
        uploaded_at: DateTime<Utc>,
    ) -> String {
        let url = format!("{BASE_URL}/{pathname}");
        let mut objects = self.objects.write().await;
        objects.retain(|o| o.record.url != url);
        objects.push(StoredObject {
            record: ImageRecord {
                url: url.clone(),
                pathname: pathname.to_string(),
                size: body.len() as u64,
                uploaded_at,
            },
            content_type: "image/jpeg".to_string(),
            body: Bytes::copy_from_slice(body),
        });
        url
    }

    /// Content type and bytes stored under a url
    pub async fn object(&self, url: &str) -> Option<(String, Bytes)> {
        self.objects
            .read()
            .await
            .iter()
            .find(|o| o.record.url == url)
            .map(|o| (o.content_type.clone(), o.body.clone()))
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no object
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn check(&self) -> StoreResult<()> {
        if !self.configured {
            return Err(StoreError::MissingCredential(BLOB_TOKEN_VAR));
        }
        if self.failing {
            return Err(StoreError::Upstream {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn list(&self) -> StoreResult<Vec<ImageRecord>> {
        self.check()?;
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .map(|o| o.record.clone())
            .collect())
    }

    async fn put(
        &self,
        pathname: &str,
        body: Bytes,
        options: PutOptions,
    ) -> StoreResult<PutResult> {
        self.check()?;
        let url = format!("{BASE_URL}/{pathname}");

        let mut objects = self.objects.write().await;
        objects.retain(|o| o.record.url != url);
        objects.push(StoredObject {
            record: ImageRecord {
                url: url.clone(),
                pathname: pathname.to_string(),
                size: body.len() as u64,
                uploaded_at: Utc::now(),
            },
            content_type: options.content_type,
            body,
        });

        Ok(PutResult {
            url,
            pathname: pathname.to_string(),
        })
    }

    async fn delete(&self, urls: &[String]) -> StoreResult<()> {
        self.check()?;
        self.objects
            .write()
            .await
            .retain(|o| !urls.contains(&o.record.url));
        Ok(())
    }
}
