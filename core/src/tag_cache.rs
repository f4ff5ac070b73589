//! Tag Cache Manager
//!
//! Loads the list of available tags at startup, preferring a time-bounded
//! copy in client-side storage over a call to the quote service.
//!
//! # Algorithm
//!
//! 1. Read the persisted [`TagCacheEntry`]
//! 2. If it is current (matching schema version, younger than the TTL),
//!    publish its tags and stop
//! 3. Otherwise fetch from the service, normalize, publish, and persist a
//!    fresh entry stamped with the current time
//! 4. On failure, log, mark the store failed, and leave its tags alone
//!
//! The load is best-effort. Callers spawn it and move on; the tag picker
//! observes the [`TagStore`] for the result.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, QuoteBackend};
use crate::quote::normalize_tags;
use crate::storage::{KeyValueStore, StorageError};
use crate::tag_store::TagStore;

/// Storage key for the cached tag list
pub const TAG_CACHE_KEY: &str = "tagCache";

/// Schema version written by this build
pub const TAG_CACHE_VERSION: u32 = 1;

/// Default cache lifetime: 24 hours
pub const DEFAULT_TAG_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Errors from a tag load attempt
#[derive(Debug, Error)]
pub enum TagCacheError {
    /// Quote service call failed
    #[error("failed to fetch tags: {0}")]
    Backend(#[from] BackendError),

    /// Cache record could not be encoded
    #[error("failed to encode tag cache: {0}")]
    Encode(#[from] serde_json::Error),

    /// Storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted tag list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCacheEntry {
    /// Schema version; records without one predate versioning
    #[serde(default)]
    pub version: u32,
    /// Normalized tag names
    pub tags: Vec<String>,
    /// When the tags were fetched, epoch milliseconds
    pub timestamp: i64,
}

impl TagCacheEntry {
    /// Create a current-version entry stamped `fetched_at`
    #[must_use]
    pub fn new(tags: Vec<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            version: TAG_CACHE_VERSION,
            tags,
            timestamp: fetched_at.timestamp_millis(),
        }
    }

    /// Age of the entry at `now`, in milliseconds (negative if stamped in the future)
    #[must_use]
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.timestamp
    }

    /// Valid iff the schema matches and `now - timestamp < ttl`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.version == TAG_CACHE_VERSION && self.age_ms(now) < ttl_ms
    }
}

/// Where a successful load got its tags from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagSource {
    /// A current cache entry; no network call was made
    Cache,
    /// The quote service; the cache was rewritten
    Remote,
}

/// Loads tags into a [`TagStore`] through the storage cache
pub struct TagCacheManager<B: QuoteBackend> {
    backend: Arc<B>,
    storage: Arc<dyn KeyValueStore>,
    store: TagStore,
    ttl: Duration,
}

impl<B: QuoteBackend + 'static> TagCacheManager<B> {
    /// Create a manager with the default 24h TTL
    pub fn new(backend: Arc<B>, storage: Arc<dyn KeyValueStore>, store: TagStore) -> Self {
        Self {
            backend,
            storage,
            store,
            ttl: DEFAULT_TAG_CACHE_TTL,
        }
    }

    /// Override the cache lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Store this manager publishes into
    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Run the load in the background
    ///
    /// The handle resolves to the tag source, or `None` on failure. Dropping
    /// it does not cancel the load.
    pub fn spawn(self) -> JoinHandle<Option<TagSource>> {
        tokio::spawn(async move { self.load_tags().await })
    }

    /// Best-effort load using the wall clock
    pub async fn load_tags(&self) -> Option<TagSource> {
        self.load_tags_at(Utc::now()).await
    }

    /// Best-effort load as of `now`
    ///
    /// Failures are logged and recorded on the store, never returned.
    pub async fn load_tags_at(&self, now: DateTime<Utc>) -> Option<TagSource> {
        match self.try_load_at(now).await {
            Ok(source) => Some(source),
            Err(e) => {
                error!(error = %e, "Failed to fetch tags");
                self.store.mark_failed();
                None
            }
        }
    }

    /// Load as of `now`, surfacing the error
    ///
    /// # Errors
    ///
    /// Returns [`TagCacheError::Backend`] if the cache is unusable and the
    /// service call fails. Storage problems on read or write are logged and
    /// do not fail the load.
    pub async fn try_load_at(&self, now: DateTime<Utc>) -> Result<TagSource, TagCacheError> {
        if let Some(entry) = self.read_cache().await {
            if entry.is_valid_at(now, self.ttl) {
                info!(count = entry.tags.len(), "Using cached tags");
                self.store.publish(&entry.tags);
                return Ok(TagSource::Cache);
            }
            debug!(
                age_ms = entry.age_ms(now),
                version = entry.version,
                "Tag cache is stale"
            );
        }

        info!(backend = self.backend.name(), "Fetching fresh tags");
        let records = self.backend.list_tags().await?;
        let tags = normalize_tags(records.iter().map(|r| r.name.as_str()));
        self.store.publish(&tags);

        let entry = TagCacheEntry::new(tags, now);
        if let Err(e) = self.write_cache(&entry).await {
            warn!(error = %e, "Failed to persist tag cache");
        }

        Ok(TagSource::Remote)
    }

    /// Read and decode the cache record; anything unusable counts as absent
    async fn read_cache(&self) -> Option<TagCacheEntry> {
        let raw = match self.storage.get(TAG_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read tag cache");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt tag cache");
                None
            }
        }
    }

    async fn write_cache(&self, entry: &TagCacheEntry) -> Result<(), TagCacheError> {
        let raw = serde_json::to_string(entry)?;
        self.storage.set(TAG_CACHE_KEY, &raw).await?;
        Ok(())
    }
}
