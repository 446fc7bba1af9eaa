//! HTTP client for the album API

use common_types::{
    DeleteRequest, DeleteResponse, ErrorResponse, ImageRecord, ListResponse, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::file::UploadFile;

/// Multipart field carrying the files
const FILES_FIELD: &str = "files";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

impl GatewayError {
    /// Whether the server answered with a failure envelope
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Message to show the user
    ///
    /// Server-reported messages are shown as is, anything else gets the
    /// generic `fallback`.
    #[must_use]
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Typed calls to the list, upload and delete endpoints
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    /// # Arguments
    ///
    /// * `base_url` - Address of the album API, e.g. `http://localhost:8001`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches every image, newest first
    ///
    /// # Errors
    ///
    /// Transport, decoding or server-reported failures
    #[instrument(skip(self))]
    pub async fn list(&self) -> GatewayResult<Vec<ImageRecord>> {
        let response = self.http.get(self.endpoint("/api/list")).send().await?;
        let body: ListResponse = decode(response).await?;
        debug!(count = body.images.len(), "listed images");
        Ok(body.images)
    }

    /// Uploads `files` in a single multipart request
    ///
    /// # Errors
    ///
    /// Transport, decoding or server-reported failures
    #[instrument(skip_all, fields(files = files.len()))]
    pub async fn upload(&self, files: Vec<UploadFile>) -> GatewayResult<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.name)
                .mime_str(&file.content_type)?;
            form = form.part(FILES_FIELD, part);
        }

        let response = self
            .http
            .post(self.endpoint("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    /// Deletes the images with the given urls
    ///
    /// # Errors
    ///
    /// Transport, decoding or server-reported failures
    #[instrument(skip_all, fields(urls = urls.len()))]
    pub async fn delete(&self, urls: &[String]) -> GatewayResult<DeleteResponse> {
        let request = DeleteRequest {
            urls: urls.to_vec(),
        };
        let response = self
            .http
            .delete(self.endpoint("/api/delete"))
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }
}

/// Decodes a success body, or turns the failure envelope into an error
async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(GatewayError::Decode);
    }

    let message = serde_json::from_slice::<ErrorResponse>(&body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());

    Err(GatewayError::Server {
        status: status.as_u16(),
        message,
    })
}
