//! Environment configuration for different deployment stages

use std::env;
use std::str::FromStr;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use strum::{Display, EnumString};

/// Default base url of the hosted blob API
pub const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Which blob store the gateway forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BlobBackend {
    /// Hosted blob HTTP API authenticated by `BLOB_READ_WRITE_TOKEN`
    Vercel,
    /// S3 bucket (`LocalStack` in development)
    S3,
}

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (S3 goes to `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Blob store selected by `BLOB_BACKEND`, hosted API by default
    ///
    /// # Panics
    ///
    /// Panics if `BLOB_BACKEND` names an unknown backend
    #[must_use]
    pub fn blob_backend(&self) -> BlobBackend {
        env::var("BLOB_BACKEND").map_or(BlobBackend::Vercel, |val| {
            BlobBackend::from_str(val.trim())
                .unwrap_or_else(|_| panic!("Invalid blob backend: {val}"))
        })
    }

    /// Read/write token of the hosted blob API
    ///
    /// Absence is not fatal at startup; the list endpoint reports it.
    #[must_use]
    pub fn blob_read_write_token(&self) -> Option<String> {
        env::var("BLOB_READ_WRITE_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
    }

    /// Base url of the hosted blob API
    #[must_use]
    pub fn blob_api_url(&self) -> String {
        env::var("VERCEL_BLOB_API_URL").unwrap_or_else(|_| DEFAULT_BLOB_API_URL.to_string())
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "photo-album".to_string())
            }
        }
    }

    /// Url prefix under which bucket objects are publicly reachable
    ///
    /// # Panics
    ///
    /// Panics if `PUBLIC_BASE_URL` is not set outside development
    #[must_use]
    pub fn public_base_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("PUBLIC_BASE_URL")
                .expect("PUBLIC_BASE_URL environment variable is not set"),
            Self::Development => env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("{LOCALSTACK_ENDPOINT}/{}", self.s3_bucket())),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Upper bound on the time a single request may take
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(60);
        Duration::from_secs(secs)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some(LOCALSTACK_ENDPOINT),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        assert_eq!(Environment::from_env(), Environment::Development);

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let result = std::panic::catch_unwind(Environment::from_env);
        env::remove_var("APP_ENV");
        std::panic::resume_unwind(result.unwrap_err());
    }

    #[test]
    #[serial]
    fn test_blob_backend_selection() {
        let env = Environment::Development;

        env::remove_var("BLOB_BACKEND");
        assert_eq!(env.blob_backend(), BlobBackend::Vercel);

        env::set_var("BLOB_BACKEND", "S3");
        assert_eq!(env.blob_backend(), BlobBackend::S3);

        env::set_var("BLOB_BACKEND", "vercel");
        assert_eq!(env.blob_backend(), BlobBackend::Vercel);

        env::remove_var("BLOB_BACKEND");
    }

    #[test]
    #[serial]
    fn test_blank_token_is_treated_as_missing() {
        let env = Environment::Development;

        env::remove_var("BLOB_READ_WRITE_TOKEN");
        assert_eq!(env.blob_read_write_token(), None);

        env::set_var("BLOB_READ_WRITE_TOKEN", "   ");
        assert_eq!(env.blob_read_write_token(), None);

        env::set_var("BLOB_READ_WRITE_TOKEN", "vercel_blob_rw_test");
        assert_eq!(
            env.blob_read_write_token().as_deref(),
            Some("vercel_blob_rw_test")
        );

        env::remove_var("BLOB_READ_WRITE_TOKEN");
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("PUBLIC_BASE_URL");
        env::remove_var("REQUEST_TIMEOUT_SECS");
        env::remove_var("VERCEL_BLOB_API_URL");

        let env = Environment::Development;
        assert_eq!(env.s3_bucket(), "photo-album");
        assert_eq!(env.public_base_url(), "http://localhost:4566/photo-album");
        assert_eq!(env.request_timeout(), Duration::from_secs(60));
        assert_eq!(env.blob_api_url(), DEFAULT_BLOB_API_URL);
        assert!(env.show_api_docs());
        assert!(!Environment::Production.show_api_docs());

        env::set_var("REQUEST_TIMEOUT_SECS", "invalid");
        assert_eq!(env.request_timeout(), Duration::from_secs(60));
        env::remove_var("REQUEST_TIMEOUT_SECS");
    }
}
