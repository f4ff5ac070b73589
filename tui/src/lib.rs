//! Golden Thought TUI - Terminal interface for the quote client
//!
//! This crate renders the headless [`thought_core::ViewComposer`] as a
//! full-screen terminal UI: a tag picker with search, a quote panel and a
//! refresh button.
//!
//! # Architecture
//!
//! - **App**: event loop, key and mouse routing, frame layout
//! - **Controls**: hit regions and focus order for everything clickable
//! - **Widgets**: borderless quote panel and flowing tag chips
//! - **Theme**: golden palette

pub mod app;
pub mod controls;
pub mod theme;
pub mod widgets;

pub use app::App;
