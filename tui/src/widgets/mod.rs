//! Widgets
//!
//! Borderless ratatui widgets for the quote panel and tag picker.

pub mod quote_panel;
pub mod tag_picker;

pub use quote_panel::QuotePanel;
pub use tag_picker::TagPicker;
