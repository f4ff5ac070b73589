//! Quotable Backend Implementation
//!
//! Backend for the public Quotable API.
//!
//! # Quotable API
//!
//! - `GET /tags` - every tag, as an array of `{ name, slug, quoteCount, .. }`
//! - `GET /quotes/random` - an array holding one random quote
//! - `GET /quotes/random?tags=<tag>` - same, constrained to a tag

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::traits::{BackendError, QuoteBackend};
use crate::config::ApiConfig;
use crate::quote::{Quote, TagRecord};

/// Default public endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.quotable.io";

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("golden-thought/", env!("CARGO_PKG_VERSION"));

/// Quotable HTTP client
#[derive(Clone, Debug)]
pub struct QuotableBackend {
    /// Base URL, always ending in `/` so relative joins append
    base_url: Url,
    /// HTTP client
    http_client: reqwest::Client,
}

impl QuotableBackend {
    /// Create a backend for `base_url`
    ///
    /// `timeout` of `None` leaves the transport default in place.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Client`] if the HTTP client cannot be built.
    pub fn new(
        mut base_url: Url,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(BackendError::Client)?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create from the resolved `[api]` configuration
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, BackendError> {
        Self::new(
            config.base_url.clone(),
            &config.user_agent,
            config.request_timeout,
        )
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Tag-listing endpoint URL
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the join fails.
    pub fn tags_url(&self) -> Result<Url, BackendError> {
        Ok(self.base_url.join("tags")?)
    }

    /// Random-quote endpoint URL, with `tags=<tag>` when a filter is given
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the join fails.
    pub fn random_quote_url(&self, tag: Option<&str>) -> Result<Url, BackendError> {
        let mut url = self.base_url.join("quotes/random")?;
        if let Some(tag) = tag {
            url.query_pairs_mut().append_pair("tags", tag);
        }
        Ok(url)
    }

    /// GET `url` and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let url_str = url.to_string();
        debug!(url = %url_str, "GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport {
                url: url_str.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| BackendError::Decode {
            url: url_str,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl QuoteBackend for QuotableBackend {
    fn name(&self) -> &'static str {
        "Quotable"
    }

    async fn list_tags(&self) -> Result<Vec<TagRecord>, BackendError> {
        let url = self.tags_url()?;
        self.get_json(url).await
    }

    async fn random_quote(&self, tag: Option<&str>) -> Result<Quote, BackendError> {
        let url = self.random_quote_url(tag)?;
        let url_str = url.to_string();
        let quotes: Vec<Quote> = self.get_json(url).await?;

        // The endpoint wraps its single quote in an array
        quotes
            .into_iter()
            .next()
            .ok_or(BackendError::EmptyResponse { url: url_str })
    }
}
