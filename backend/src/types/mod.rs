mod environment;
mod error;
mod extractors;

pub use environment::{BlobBackend, Environment, DEFAULT_BLOB_API_URL};
pub use error::AppError;
pub use extractors::ValidatedJson;
