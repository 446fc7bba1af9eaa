//! Hosted blob API client

use async_trait::async_trait;
use bytes::Bytes;
use common_types::ImageRecord;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{BlobStore, PutOptions, PutResult, StoreError, StoreResult, BLOB_TOKEN_VAR};

const API_VERSION: &str = "7";
const LIST_PAGE_SIZE: &str = "1000";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    blobs: Vec<ImageRecord>,
    cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    pathname: String,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    urls: &'a [String],
}

/// Blob store backed by the hosted blob HTTP API
///
/// Every call authenticates with the read/write token. The token is optional
/// at construction so that a misconfigured deployment still starts and
/// reports the problem per request.
pub struct VercelBlobStore {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl VercelBlobStore {
    /// Creates a new hosted blob store client
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base url of the blob API, without trailing slash
    /// * `token` - Read/write token, `None` when not configured
    #[must_use]
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> StoreResult<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or(StoreError::MissingCredential(BLOB_TOKEN_VAR))?;

        Ok(request
            .bearer_auth(token)
            .header("x-api-version", API_VERSION))
    }

    async fn check_status(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BlobStore for VercelBlobStore {
    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<ImageRecord>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&self.api_url)
                .query(&[("limit", LIST_PAGE_SIZE)]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            let response = self.authorized(request)?.send().await?;
            let page: ListPage = Self::check_status(response).await?.json().await?;

            debug!(count = page.blobs.len(), has_more = page.has_more, "Fetched blob page");
            records.extend(page.blobs);

            match page.cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    #[instrument(skip(self, body, options), fields(size = body.len()))]
    async fn put(
        &self,
        pathname: &str,
        body: Bytes,
        options: PutOptions,
    ) -> StoreResult<PutResult> {
        if !options.public {
            return Err(StoreError::InvalidInput(
                "the hosted blob store only serves public objects".to_string(),
            ));
        }

        let request = self
            .http
            .put(format!("{}/{pathname}", self.api_url))
            .header("x-content-type", options.content_type)
            .header(
                "x-add-random-suffix",
                if options.add_random_suffix { "1" } else { "0" },
            )
            .body(body);

        let response = self.authorized(request)?.send().await?;
        let put: PutResponse = Self::check_status(response).await?.json().await?;

        Ok(PutResult {
            url: put.url,
            pathname: put.pathname,
        })
    }

    #[instrument(skip(self), fields(count = urls.len()))]
    async fn delete(&self, urls: &[String]) -> StoreResult<()> {
        let request = self
            .http
            .post(format!("{}/delete", self.api_url))
            .json(&DeleteBody { urls });

        let response = self.authorized(request)?.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
