//! Photo album gateway: list, upload and delete photos in a managed blob store

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Blob store client and backends
pub mod blob_store;

/// Generated storage names for uploads
pub mod pathname;

/// HTTP routes
pub mod routes;

/// Server startup
pub mod server;

/// Configuration, errors and extractors
pub mod types;
