//! View Composer
//!
//! Owns the selected tag and the tag filter, drives the quote fetcher and
//! the tag loader, and reduces all of it into a [`Screen`] the surface
//! renders each frame.
//!
//! # Lifecycle
//!
//! ```text
//! mount() ──► TagCacheManager::spawn()      (tags, best-effort)
//!        └──► QuoteFetcher::spawn_fetch(None) (first quote, unconstrained)
//!
//! handle(UserAction::Refresh)   ──► spawn_fetch(selected_tag)
//! handle(UserAction::ActivateTag) ─► selection only, no fetch
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::QuoteBackend;
use crate::quote::Quote;
use crate::quote_fetcher::{FetchError, QuoteDisplay, QuoteFetcher, QuotePanelState};
use crate::tag_cache::{TagCacheManager, TagSource};
use crate::tag_filter::{toggle_selection, TagFilter, TagPickerView};
use crate::tag_store::{TagList, TagStore};

/// Shown in the quote panel before anything has been fetched
pub const EMPTY_QUOTE_MESSAGE: &str = "No quote to display. Click the button to get started.";

/// Handle to an in-flight quote fetch
pub type FetchHandle = JoinHandle<Result<Quote, FetchError>>;

/// Interactions routed from the surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    /// A tag chip was activated
    ActivateTag(String),
    /// The refresh control was activated
    Refresh,
    /// A character was typed into the search box
    SearchInput(char),
    /// Backspace in the search box
    SearchBackspace,
    /// The clear-search control was activated
    ClearSearch,
    /// The show more / show less control was activated
    ToggleExpanded,
}

/// The refresh button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshControl {
    /// Accepts activation
    pub enabled: bool,
}

impl RefreshControl {
    /// Button label
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.enabled {
            "New Thought"
        } else {
            "Loading..."
        }
    }
}

/// One frame's worth of view state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    /// Quote panel
    pub quote: QuoteDisplay,
    /// Tag picker
    pub picker: TagPickerView,
    /// Refresh button
    pub refresh: RefreshControl,
    /// Active tag filter
    pub selected_tag: Option<String>,
}

/// Background tasks started by [`ViewComposer::mount`]
pub struct MountHandles {
    /// Startup tag load
    pub tags: JoinHandle<Option<TagSource>>,
    /// Initial quote fetch
    pub quote: FetchHandle,
}

/// Composes tag loading, quote fetching and the tag filter
pub struct ViewComposer<B: QuoteBackend> {
    fetcher: QuoteFetcher<B>,
    tags: TagStore,
    loader: Option<TagCacheManager<B>>,
    filter: TagFilter,
    selected_tag: Option<String>,
}

impl<B: QuoteBackend + 'static> ViewComposer<B> {
    /// Create a composer around a backend and its tag loader
    ///
    /// The tag store is the one `loader` publishes into.
    pub fn new(backend: Arc<B>, loader: TagCacheManager<B>) -> Self {
        Self {
            fetcher: QuoteFetcher::new(backend),
            tags: loader.store().clone(),
            loader: Some(loader),
            filter: TagFilter::new(),
            selected_tag: None,
        }
    }

    /// Start with `tag` selected; the mount fetch ignores it
    #[must_use]
    pub fn with_selected_tag(mut self, tag: Option<&str>) -> Self {
        self.selected_tag = tag.map(str::to_lowercase);
        self
    }

    /// Start the tag load and the first unconstrained fetch
    ///
    /// Returns `None` if already mounted.
    pub fn mount(&mut self) -> Option<MountHandles> {
        let loader = self.loader.take()?;
        info!("Mounting view");
        Some(MountHandles {
            tags: loader.spawn(),
            quote: self.fetcher.spawn_fetch(None),
        })
    }

    /// Apply a user action
    ///
    /// Returns the fetch handle when the action started a fetch.
    pub fn handle(&mut self, action: UserAction) -> Option<FetchHandle> {
        match action {
            UserAction::ActivateTag(tag) => {
                self.selected_tag = toggle_selection(self.selected_tag.as_deref(), &tag);
                debug!(selected = ?self.selected_tag, "Tag selection changed");
                None
            }
            UserAction::Refresh => self.refresh(),
            UserAction::SearchInput(c) => {
                if self.search_enabled() {
                    self.filter.push_char(c);
                }
                None
            }
            UserAction::SearchBackspace => {
                if self.search_enabled() {
                    self.filter.pop_char();
                }
                None
            }
            UserAction::ClearSearch => {
                self.filter.clear_search();
                None
            }
            UserAction::ToggleExpanded => {
                self.filter.toggle_expanded();
                None
            }
        }
    }

    fn refresh(&self) -> Option<FetchHandle> {
        if self.fetcher.is_loading() {
            debug!("Refresh ignored while a fetch is in flight");
            return None;
        }
        Some(self.fetcher.spawn_fetch(self.selected_tag.clone()))
    }

    fn search_enabled(&self) -> bool {
        !self.tags.snapshot().is_loading()
    }

    /// Derive the current screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        let panel = self.fetcher.snapshot();
        let tags = self.tags.snapshot();
        Screen {
            quote: panel.display(),
            picker: self.filter.view(&tags, self.selected_tag.as_deref()),
            refresh: RefreshControl {
                enabled: !panel.loading,
            },
            selected_tag: self.selected_tag.clone(),
        }
    }

    /// Active tag filter
    #[must_use]
    pub fn selected_tag(&self) -> Option<&str> {
        self.selected_tag.as_deref()
    }

    /// Tag filter state
    #[must_use]
    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// Receiver notified when the quote panel changes
    #[must_use]
    pub fn quote_updates(&self) -> watch::Receiver<QuotePanelState> {
        self.fetcher.subscribe()
    }

    /// Receiver notified when the tag list changes
    #[must_use]
    pub fn tag_updates(&self) -> watch::Receiver<TagList> {
        self.tags.subscribe()
    }
}
