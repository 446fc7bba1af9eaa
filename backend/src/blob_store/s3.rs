//! S3-backed blob store

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    primitives::{ByteStream, DateTime as S3DateTime},
    types::{Delete, ObjectCannedAcl, ObjectIdentifier},
    Client as S3Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common_types::ImageRecord;
use tracing::{debug, instrument, warn};

use super::{BlobStore, PutOptions, PutResult, StoreError, StoreResult};

/// `DeleteObjects` accepts at most this many keys per call
const MAX_DELETE_BATCH: usize = 1000;

/// Blob store client for S3 operations
///
/// Objects are addressed publicly as `{public_base_url}/{key}`; the same
/// prefix is stripped again when deleting by url. S3 never rewrites keys, so
/// [`PutOptions::add_random_suffix`] has no effect here.
pub struct S3BlobStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
}

impl S3BlobStore {
    /// Creates a new S3 blob store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding the album
    /// * `public_base_url` - Url prefix under which bucket keys are publicly served
    #[must_use]
    pub fn new(s3_client: Arc<S3Client>, bucket_name: String, public_base_url: &str) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for_key(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    fn key_for_url<'a>(&self, url: &'a str) -> StoreResult<&'a str> {
        url.strip_prefix(self.public_base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StoreError::InvalidInput(format!("url is not served by this bucket: {url}"))
            })
    }
}

fn to_chrono(timestamp: Option<&S3DateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn is_configured(&self) -> bool {
        // Credentials come from the AWS provider chain and are checked per call
        !self.bucket_name.is_empty()
    }

    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    async fn list(&self) -> StoreResult<Vec<ImageRecord>> {
        let mut pages = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                records.push(ImageRecord {
                    url: self.url_for_key(key),
                    pathname: key.to_string(),
                    size: u64::try_from(object.size().unwrap_or_default()).unwrap_or_default(),
                    uploaded_at: to_chrono(object.last_modified()),
                });
            }
        }

        debug!(count = records.len(), "Listed bucket objects");
        Ok(records)
    }

    #[instrument(skip(self, body, options), fields(bucket = %self.bucket_name, size = body.len()))]
    async fn put(
        &self,
        pathname: &str,
        body: Bytes,
        options: PutOptions,
    ) -> StoreResult<PutResult> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(pathname)
            .content_type(options.content_type)
            .set_acl(options.public.then_some(ObjectCannedAcl::PublicRead))
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(PutResult {
            url: self.url_for_key(pathname),
            pathname: pathname.to_string(),
        })
    }

    #[instrument(skip(self), fields(bucket = %self.bucket_name, count = urls.len()))]
    async fn delete(&self, urls: &[String]) -> StoreResult<()> {
        let keys = urls
            .iter()
            .map(|url| self.key_for_url(url))
            .collect::<StoreResult<Vec<_>>>()?;

        for batch in keys.chunks(MAX_DELETE_BATCH) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(*key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;

            let output = self
                .s3_client
                .delete_objects()
                .bucket(&self.bucket_name)
                .delete(delete)
                .send()
                .await?;

            if let Some(failure) = output.errors().first() {
                warn!(failed = output.errors().len(), "Bucket rejected some deletions");
                return Err(StoreError::S3Error(format!(
                    "failed to delete {}: {}",
                    failure.key().unwrap_or_default(),
                    failure.message().unwrap_or_default()
                )));
            }
        }

        Ok(())
    }
}
