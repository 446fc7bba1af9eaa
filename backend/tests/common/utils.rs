use axum::response::Response;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;

const BOUNDARY: &str = "----album-test-boundary";

/// One multipart part
pub struct TestFile {
    /// Form field name, `files` for uploads
    pub field: &'static str,
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl TestFile {
    pub fn new(file_name: &'static str, content_type: &'static str, size: usize) -> Self {
        Self {
            field: "files",
            file_name,
            content_type,
            body: (0..size).map(|i| (i % 251) as u8).collect(),
        }
    }
}

/// Encode parts as `multipart/form-data`, returning content type and body
pub fn multipart_body(files: &[TestFile]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for file in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Fixed timestamp `minutes` after a reference instant
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_000_000 + minutes * 60, 0).unwrap()
}
