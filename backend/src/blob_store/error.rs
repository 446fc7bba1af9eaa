//! Error types for blob store operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        delete_objects::DeleteObjectsError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
};
use thiserror::Error;

/// Result type for blob store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the blob store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store credential is absent from the process environment
    #[error("{0} environment variable is not configured")]
    MissingCredential(&'static str),

    /// Transport failure before a response was received
    #[error("Blob store request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status
    #[error("Blob store returned {status}: {message}")]
    Upstream {
        /// HTTP status code returned by the store
        status: u16,
        /// Response body or service error description
        message: String,
    },

    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// The store response could not be decoded
    #[error("Unexpected blob store response: {0}")]
    InvalidResponse(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<SdkError<ListObjectsV2Error>> for StoreError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        match error {
            SdkError::ServiceError(err) => Self::Upstream {
                status: err.raw().status().as_u16(),
                message: format!("{:?}", err.err()),
            },
            _ => Self::S3Error(error.to_string()),
        }
    }
}

impl From<SdkError<PutObjectError>> for StoreError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::S3Error(error.to_string())
    }
}

impl From<SdkError<DeleteObjectsError>> for StoreError {
    fn from(error: SdkError<DeleteObjectsError>) -> Self {
        Self::S3Error(error.to_string())
    }
}
