//! Error types for app-catalog-core

use thiserror::Error;

/// Errors that can cross the catalog boundary.
///
/// Only I/O-level failures live here. A response body with the wrong shape
/// or a metric that fails to parse is absorbed by the retrieval layer and
/// never becomes an error.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure talking to the catalog service
    #[error("HTTP error: {0}")]
    Http(String),

    /// Catalog service answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any could be read
        body: String,
    },

    /// Catalog service rejected the bearer token
    #[error("Unauthorized - please login again")]
    Unauthorized,

    /// Response body could not be decoded as JSON
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// IO error (fixture files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (fixture files)
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fixture file parsed but did not contain a record list
    #[error("Invalid fixture set: {0}")]
    InvalidFixtures(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Http(err.to_string())
        }
    }
}
