//! Quote Fetcher
//!
//! Performs one random-quote request per user action and maps the outcome
//! into the quote panel state.
//!
//! # State transitions
//!
//! - On invocation: `loading = true`, `error = None`, before any I/O
//! - On success: quote replaced, error cleared
//! - On failure: fixed user-facing message stored, previous quote kept
//! - Always, last: `loading = false`
//!
//! # Stale responses
//!
//! Every fetch takes the next generation number. Only a response whose
//! generation is still the latest is applied, and only the latest fetch
//! clears `loading`. An older response that arrives late is dropped and
//! its caller gets [`FetchError::Superseded`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::backend::{BackendError, QuoteBackend};
use crate::quote::Quote;

/// The only error text a user ever sees for a failed fetch
pub const QUOTE_FETCH_ERROR_MESSAGE: &str = "Failed to fetch a quote. Please try again.";

/// Why a fetch did not produce a displayed quote
#[derive(Debug, Error)]
pub enum FetchError {
    /// Service call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A newer fetch started before this one finished
    #[error("fetch {generation} superseded by fetch {latest}")]
    Superseded {
        /// Generation of this fetch
        generation: u64,
        /// Generation that was current when this one finished
        latest: u64,
    },
}

/// State backing the quote panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuotePanelState {
    /// Last successfully fetched quote
    pub quote: Option<Quote>,
    /// A fetch is in flight
    pub loading: bool,
    /// User-facing message from the last failed fetch
    pub error: Option<String>,
    /// Generation of the most recently started fetch (0 = none yet)
    pub generation: u64,
}

/// What the quote panel shows; the variants are mutually exclusive
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteDisplay {
    /// Spinner
    Loading,
    /// Error message
    Error(String),
    /// A quote
    Content(Quote),
    /// Nothing fetched yet
    Empty,
}

impl QuotePanelState {
    /// Resolve the panel's display, loading first, then error, then content
    #[must_use]
    pub fn display(&self) -> QuoteDisplay {
        if self.loading {
            QuoteDisplay::Loading
        } else if let Some(error) = &self.error {
            QuoteDisplay::Error(error.clone())
        } else if let Some(quote) = &self.quote {
            QuoteDisplay::Content(quote.clone())
        } else {
            QuoteDisplay::Empty
        }
    }
}

/// Clears `loading` when dropped, if its fetch is still the latest
///
/// Held for the duration of a fetch so every exit path releases the flag,
/// including a future dropped mid-request.
struct LoadingGuard {
    state: Arc<watch::Sender<QuotePanelState>>,
    generation: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let generation = self.generation;
        self.state.send_if_modified(|state| {
            if state.generation == generation && state.loading {
                state.loading = false;
                true
            } else {
                false
            }
        });
    }
}

/// Fetches quotes and owns the quote panel state
pub struct QuoteFetcher<B: QuoteBackend> {
    backend: Arc<B>,
    state: Arc<watch::Sender<QuotePanelState>>,
}

impl<B: QuoteBackend> Clone for QuoteFetcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: QuoteBackend + 'static> QuoteFetcher<B> {
    /// Create a fetcher with an empty panel
    pub fn new(backend: Arc<B>) -> Self {
        let (tx, _rx) = watch::channel(QuotePanelState::default());
        Self {
            backend,
            state: Arc::new(tx),
        }
    }

    /// Current panel state
    #[must_use]
    pub fn snapshot(&self) -> QuotePanelState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every panel change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuotePanelState> {
        self.state.subscribe()
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Fetch a quote and apply it to the panel
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Backend`] when the request fails and
    /// [`FetchError::Superseded`] when a newer fetch started meanwhile.
    pub async fn fetch_quote(&self, tag: Option<String>) -> Result<Quote, FetchError> {
        let guard = self.begin();
        self.run(guard, tag).await
    }

    /// Start a fetch on the runtime and return immediately
    ///
    /// `loading` is already set when this returns, so a control disabled
    /// while loading is disabled on the very next frame.
    pub fn spawn_fetch(&self, tag: Option<String>) -> JoinHandle<Result<Quote, FetchError>> {
        let guard = self.begin();
        let fetcher = self.clone();
        tokio::spawn(async move { fetcher.run(guard, tag).await })
    }

    /// Take the next generation and enter the loading state
    fn begin(&self) -> LoadingGuard {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.loading = true;
            state.error = None;
            generation = state.generation;
        });
        LoadingGuard {
            state: Arc::clone(&self.state),
            generation,
        }
    }

    async fn run(&self, guard: LoadingGuard, tag: Option<String>) -> Result<Quote, FetchError> {
        let generation = guard.generation;
        debug!(generation, tag = ?tag, "Fetching quote");

        let result = self.backend.random_quote(tag.as_deref()).await;
        let outcome = self.complete(generation, result);

        drop(guard);
        outcome
    }

    /// Apply a response if its generation is still the latest
    fn complete(
        &self,
        generation: u64,
        result: Result<Quote, BackendError>,
    ) -> Result<Quote, FetchError> {
        if let Err(e) = &result {
            error!(generation, error = %e, "Failed to fetch quote");
        }

        let mut latest = generation;
        let applied = self.state.send_if_modified(|state| {
            latest = state.generation;
            if state.generation != generation {
                return false;
            }
            match &result {
                Ok(quote) => {
                    state.quote = Some(quote.clone());
                    state.error = None;
                }
                Err(_) => state.error = Some(QUOTE_FETCH_ERROR_MESSAGE.to_string()),
            }
            true
        });

        if !applied {
            debug!(generation, latest, "Dropping superseded quote response");
            return Err(FetchError::Superseded { generation, latest });
        }

        result.map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;
    use crate::quote::TagRecord;

    fn quote(id: &str) -> Quote {
        Quote {
            id: id.to_string(),
            content: format!("content {id}"),
            author: "Author".to_string(),
            tags: vec!["wisdom".to_string()],
        }
    }

    type Scripted = oneshot::Receiver<Result<Quote, BackendError>>;

    /// Backend whose responses are released by the test, keyed by tag
    #[derive(Default)]
    struct ScriptedBackend {
        pending: Mutex<HashMap<Option<String>, VecDeque<Scripted>>>,
        requested_tags: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedBackend {
        fn script(&self, tag: Option<&str>) -> oneshot::Sender<Result<Quote, BackendError>> {
            let (tx, rx) = oneshot::channel();
            self.pending
                .lock()
                .entry(tag.map(str::to_string))
                .or_default()
                .push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl QuoteBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "Scripted"
        }

        async fn list_tags(&self) -> Result<Vec<TagRecord>, BackendError> {
            Ok(Vec::new())
        }

        async fn random_quote(&self, tag: Option<&str>) -> Result<Quote, BackendError> {
            let key = tag.map(str::to_string);
            self.requested_tags.lock().push(key.clone());
            let rx = self
                .pending
                .lock()
                .get_mut(&key)
                .and_then(VecDeque::pop_front)
                .expect("unscripted request");
            rx.await.expect("script dropped")
        }
    }

    fn server_error() -> BackendError {
        BackendError::Status {
            url: "mock://quotes/random".to_string(),
            status: 500,
        }
    }

    #[tokio::test]
    async fn test_success_sets_quote_and_clears_loading() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());
        backend.script(None).send(Ok(quote("q1"))).unwrap();

        let result = fetcher.fetch_quote(None).await.unwrap();

        assert_eq!(result, quote("q1"));
        let state = fetcher.snapshot();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.display(), QuoteDisplay::Content(quote("q1")));
    }

    #[tokio::test]
    async fn test_loading_is_set_before_response() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());
        let release = backend.script(Some("wisdom"));

        let handle = fetcher.spawn_fetch(Some("wisdom".to_string()));
        assert!(fetcher.is_loading());
        assert_eq!(fetcher.snapshot().display(), QuoteDisplay::Loading);

        release.send(Ok(quote("q1"))).unwrap();
        handle.await.unwrap().unwrap();
        assert!(!fetcher.is_loading());
        assert_eq!(
            *backend.requested_tags.lock(),
            vec![Some("wisdom".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_quote() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());

        backend.script(None).send(Ok(quote("q1"))).unwrap();
        fetcher.fetch_quote(None).await.unwrap();

        backend.script(Some("wisdom")).send(Err(server_error())).unwrap();
        let err = fetcher.fetch_quote(Some("wisdom".to_string())).await;

        assert!(matches!(err, Err(FetchError::Backend(_))));
        let state = fetcher.snapshot();
        assert!(!state.loading);
        assert_eq!(state.quote, Some(quote("q1")));
        assert_eq!(state.error.as_deref(), Some(QUOTE_FETCH_ERROR_MESSAGE));
        assert_eq!(
            state.display(),
            QuoteDisplay::Error(QUOTE_FETCH_ERROR_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_new_fetch_clears_previous_error() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());

        backend.script(None).send(Err(server_error())).unwrap();
        let _ = fetcher.fetch_quote(None).await;
        assert!(fetcher.snapshot().error.is_some());

        let release = backend.script(None);
        let handle = fetcher.spawn_fetch(None);
        assert_eq!(fetcher.snapshot().error, None);

        release.send(Ok(quote("q2"))).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(fetcher.snapshot().quote, Some(quote("q2")));
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());

        let first = backend.script(Some("love"));
        let second = backend.script(Some("hope"));
        let old = fetcher.spawn_fetch(Some("love".to_string()));
        let new = fetcher.spawn_fetch(Some("hope".to_string()));

        // Newer response lands first
        second.send(Ok(quote("new"))).unwrap();
        assert_eq!(new.await.unwrap().unwrap(), quote("new"));
        assert!(!fetcher.is_loading());

        first.send(Ok(quote("old"))).unwrap();
        let stale = old.await.unwrap();

        assert!(matches!(
            stale,
            Err(FetchError::Superseded {
                generation: 1,
                latest: 2
            })
        ));
        let state = fetcher.snapshot();
        assert_eq!(state.quote, Some(quote("new")));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_stale_completion_does_not_clear_newer_loading() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());

        let first = backend.script(Some("love"));
        let second = backend.script(Some("hope"));
        let old = fetcher.spawn_fetch(Some("love".to_string()));
        let new = fetcher.spawn_fetch(Some("hope".to_string()));

        first.send(Err(server_error())).unwrap();
        assert!(old.await.unwrap().is_err());

        let state = fetcher.snapshot();
        assert!(state.loading);
        assert_eq!(state.error, None);

        second.send(Ok(quote("new"))).unwrap();
        new.await.unwrap().unwrap();
        assert!(!fetcher.is_loading());
    }

    #[tokio::test]
    async fn test_dropped_fetch_still_clears_loading() {
        let backend = Arc::new(ScriptedBackend::default());
        let fetcher = QuoteFetcher::new(backend.clone());
        let _release = backend.script(None);

        let handle = fetcher.spawn_fetch(None);
        assert!(fetcher.is_loading());
        handle.abort();
        let _ = handle.await;

        assert!(!fetcher.is_loading());
    }

    #[test]
    fn test_display_priority() {
        let mut state = QuotePanelState {
            quote: Some(quote("q1")),
            loading: true,
            error: Some("boom".to_string()),
            generation: 1,
        };
        assert_eq!(state.display(), QuoteDisplay::Loading);
        state.loading = false;
        assert_eq!(state.display(), QuoteDisplay::Error("boom".to_string()));
        state.error = None;
        assert_eq!(state.display(), QuoteDisplay::Content(quote("q1")));
        state.quote = None;
        assert_eq!(state.display(), QuoteDisplay::Empty);
    }
}
