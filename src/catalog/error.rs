//! Catalog error types.

use thiserror::Error;

/// Errors surfaced by catalog access after in-client retries are exhausted.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("catalog request failed for '{endpoint}': {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status.
    #[error("catalog returned status {status} for '{endpoint}'")]
    BadStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// The response body did not parse as the expected shape.
    #[error("failed to decode catalog response for '{endpoint}': {source}")]
    DecodeFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The requested record does not exist.
    #[error("catalog record {fdc_id} not found")]
    NotFound { fdc_id: u64 },
}
