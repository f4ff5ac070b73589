//! Shared Tag Store
//!
//! The list of available tags, shared between the tag cache manager (the
//! only writer) and the tag picker (readers).
//!
//! The store carries an explicit [`TagLoadStatus`] next to the tags, so an
//! empty list is never ambiguous between "not loaded yet" and "loaded, but
//! empty". It is backed by a `tokio::sync::watch` slot: readers either take
//! a [`snapshot`](TagStore::snapshot) each frame or
//! [`subscribe`](TagStore::subscribe) and await changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::quote::normalize_tags;

/// Progress of the startup tag load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagLoadStatus {
    /// Load has not finished
    Loading,
    /// Tags were published from the cache or the service
    Ready,
    /// Load failed; tags keep whatever they held before
    Failed,
}

impl TagLoadStatus {
    /// Whether the load is still pending
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Snapshot of the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagList {
    /// Lower-cased, unique, first-seen order
    pub tags: Vec<String>,
    /// Load progress
    pub status: TagLoadStatus,
}

impl Default for TagList {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            status: TagLoadStatus::Loading,
        }
    }
}

impl TagList {
    /// Whether the startup load is still pending
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }
}

/// Injectable container for the available tags
#[derive(Clone, Debug)]
pub struct TagStore {
    tx: Arc<watch::Sender<TagList>>,
}

impl TagStore {
    /// Create an empty store in the `Loading` state
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TagList::default());
        Self { tx: Arc::new(tx) }
    }

    /// Current contents
    #[must_use]
    pub fn snapshot(&self) -> TagList {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every publish or failure
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TagList> {
        self.tx.subscribe()
    }

    /// Replace the tags and mark the store ready
    ///
    /// Input is normalized, so the store never holds duplicates or
    /// upper-case tags regardless of where the list came from.
    pub fn publish<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = normalize_tags(tags);
        self.tx.send_modify(|list| {
            list.tags = tags;
            list.status = TagLoadStatus::Ready;
        });
    }

    /// Record a failed load, leaving the tags as they are
    pub fn mark_failed(&self) {
        self.tx.send_modify(|list| list.status = TagLoadStatus::Failed);
    }

    /// Wait until the load has either succeeded or failed
    pub async fn settled(&self) -> TagList {
        let mut rx = self.subscribe();
        let list = match rx.wait_for(|list| !list.is_loading()).await {
            Ok(list) => list.clone(),
            // Unreachable while `self` holds the sender
            Err(_) => self.snapshot(),
        };
        list
    }
}

impl Default for TagStore {
    fn default() -> Self {
        Self::new()
    }
}
