//! Thought Core - Headless Quote Orchestration for Golden Thought
//!
//! This crate holds everything behind the Golden Thought client that is not
//! drawing: talking to the quotation service, caching the tag list, tracking
//! the quote panel and tag filter, and composing them into a screen model.
//! It has no terminal dependency; `thought-tui` renders what it produces.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     thought-tui (ratatui)                    │
//! │           renders Screen ▲            │ UserAction           │
//! └──────────────────────────┼────────────┼──────────────────────┘
//!                            │            ▼
//! ┌──────────────────────────┴───────────────────────────────────┐
//! │                        ViewComposer                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐ │
//! │  │ QuoteFetcher │  │  TagFilter   │  │  TagCacheManager    │ │
//! │  │ (generation) │  │ (search/9)   │  │  (24h, versioned)   │ │
//! │  └──────┬───────┘  └──────▲───────┘  └───┬─────────────┬───┘ │
//! │         │                 │ reads        │ publishes   │     │
//! │         │          ┌──────┴───────┐      │             │     │
//! │         │          │   TagStore   │◄─────┘             │     │
//! │         │          │   (watch)    │            KeyValueStore │
//! │         │          └──────────────┘            (FileStore)   │
//! │         ▼                                                    │
//! │   QuoteBackend (QuotableBackend over reqwest)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ViewComposer`]: lifecycle and user-action routing
//! - [`QuoteFetcher`]: one request per action, loading/error state
//! - [`TagCacheManager`]: cached startup tag load
//! - [`TagStore`]: shared tag list with an explicit load status
//! - [`TagFilter`]: search and expand/collapse over the tag list
//! - [`QuoteBackend`]: the quotation service seam
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use thought_core::{
//!     config::load_config, FileStore, QuotableBackend, TagCacheManager,
//!     TagStore, UserAction, ViewComposer,
//! };
//!
//! let config = load_config()?;
//! let backend = Arc::new(QuotableBackend::from_config(&config.api)?);
//! let storage = Arc::new(FileStore::new(config.cache.dir.clone()));
//! let loader = TagCacheManager::new(backend.clone(), storage, TagStore::new())
//!     .with_ttl(config.cache.tag_ttl);
//!
//! let mut view = ViewComposer::new(backend, loader);
//! view.mount();
//! view.handle(UserAction::Refresh);
//! let screen = view.screen();
//! ```

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod composer;
pub mod config;
pub mod quote;
pub mod quote_fetcher;
pub mod storage;
pub mod tag_cache;
pub mod tag_filter;
pub mod tag_store;

// Re-exports for convenience
pub use backend::{BackendError, QuotableBackend, QuoteBackend};
pub use composer::{RefreshControl, Screen, UserAction, ViewComposer, EMPTY_QUOTE_MESSAGE};
pub use config::{ConfigError, ConfigOverrides, ConfigSource, ThoughtConfig};
pub use quote::{Quote, TagRecord};
pub use quote_fetcher::{FetchError, QuoteDisplay, QuoteFetcher, QUOTE_FETCH_ERROR_MESSAGE};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tag_cache::{TagCacheEntry, TagCacheManager, TagSource};
pub use tag_filter::{ExpandToggle, TagChip, TagFilter, TagPickerBody, TagPickerView};
pub use tag_store::{TagList, TagLoadStatus, TagStore};
