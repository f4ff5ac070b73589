//! Quote Backend Traits
//!
//! Trait definitions for the remote quotation service. The orchestration
//! layer only talks to [`QuoteBackend`], so tests can swap in a mock and a
//! different provider could be added without touching the tag cache or the
//! quote fetcher.

use async_trait::async_trait;
use thiserror::Error;

use crate::quote::{Quote, TagRecord};

/// Errors raised while talking to the quote service
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request never produced a response (DNS, connect, TLS, timeout)
    #[error("request to {url} failed: {source}")]
    Transport {
        /// URL that was requested
        url: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// Service answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Body could not be decoded into the expected shape
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// URL that was requested
        url: String,
        /// Decoder message
        message: String,
    },

    /// Random-quote endpoint returned an empty array
    #[error("{url} returned no quotes")]
    EmptyResponse {
        /// URL that was requested
        url: String,
    },

    /// Endpoint URL could not be built from the configured base
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Remote quotation service
///
/// One call per user action; implementations must not retry.
#[async_trait]
pub trait QuoteBackend: Send + Sync {
    /// Human-readable provider name for logs
    fn name(&self) -> &'static str;

    /// Fetch every tag the service knows about
    async fn list_tags(&self) -> Result<Vec<TagRecord>, BackendError>;

    /// Fetch one random quote, optionally constrained to a single tag
    async fn random_quote(&self, tag: Option<&str>) -> Result<Quote, BackendError>;
}
