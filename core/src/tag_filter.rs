//! Tag Filter State
//!
//! Search and expand/collapse state for the tag picker, plus the derived
//! view the surface renders. The tag list itself lives in the
//! [`TagStore`](crate::tag_store::TagStore); this module only decides which
//! of those tags are visible.

use crate::tag_store::{TagList, TagLoadStatus};

/// Chips shown while the picker is collapsed
pub const COLLAPSED_TAG_LIMIT: usize = 9;

/// Control that expands or collapses the chip list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandToggle {
    /// Collapsed with hidden matches
    ShowMore,
    /// Expanded
    ShowLess,
}

impl ExpandToggle {
    /// Button label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ShowMore => "Show more",
            Self::ShowLess => "Show less",
        }
    }
}

/// One tag button
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagChip {
    /// Tag name
    pub name: String,
    /// Whether this is the active filter
    pub selected: bool,
}

/// Body of the picker below the search box
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagPickerBody {
    /// Startup load still running
    Loading,
    /// Load failed and there is nothing to show
    Unavailable,
    /// Tags are loaded but none match the query
    NoMatches,
    /// Visible chips and the optional expand toggle
    Chips {
        /// Chips in display order
        chips: Vec<TagChip>,
        /// Present only when matches exceed [`COLLAPSED_TAG_LIMIT`]
        toggle: Option<ExpandToggle>,
    },
}

impl TagPickerBody {
    /// Placeholder text for the non-chip states
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Loading tags..."),
            Self::Unavailable => Some("Tags are unavailable right now"),
            Self::NoMatches => Some("No matching tags found"),
            Self::Chips { .. } => None,
        }
    }
}

/// Everything the tag picker renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagPickerView {
    /// Current search text
    pub search_query: String,
    /// Search box accepts input
    pub search_enabled: bool,
    /// The clear-search control is shown
    pub show_clear: bool,
    /// Number of tags matching the query
    pub total_matches: usize,
    /// Chips or a placeholder
    pub body: TagPickerBody,
}

impl TagPickerView {
    /// Visible chips, empty for placeholder states
    #[must_use]
    pub fn chips(&self) -> &[TagChip] {
        match &self.body {
            TagPickerBody::Chips { chips, .. } => chips,
            _ => &[],
        }
    }

    /// The expand toggle, if shown
    #[must_use]
    pub fn toggle(&self) -> Option<ExpandToggle> {
        match &self.body {
            TagPickerBody::Chips { toggle, .. } => *toggle,
            _ => None,
        }
    }
}

/// Search query and expansion flag
///
/// Neither is reset when a quote is fetched or a tag is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    search_query: String,
    expanded: bool,
}

impl TagFilter {
    /// Empty query, collapsed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether all matches are shown
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Replace the query
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Append a typed character
    pub fn push_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    /// Delete the last character
    pub fn pop_char(&mut self) {
        self.search_query.pop();
    }

    /// Reset the query; selection and expansion are untouched
    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Flip between collapsed and expanded
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Tags containing the query, case-insensitively, in list order
    #[must_use]
    pub fn filtered<'a>(&self, tags: &'a [String]) -> Vec<&'a str> {
        let needle = self.search_query.to_lowercase();
        tags.iter()
            .map(String::as_str)
            .filter(|tag| tag.to_lowercase().contains(&needle))
            .collect()
    }

    /// Derive the picker view for `list` with `selected` highlighted
    #[must_use]
    pub fn view(&self, list: &TagList, selected: Option<&str>) -> TagPickerView {
        let loading = list.is_loading();
        let matches = self.filtered(&list.tags);
        let total_matches = matches.len();

        let body = if loading {
            TagPickerBody::Loading
        } else if list.tags.is_empty() && list.status == TagLoadStatus::Failed {
            TagPickerBody::Unavailable
        } else if matches.is_empty() {
            TagPickerBody::NoMatches
        } else {
            let visible = if self.expanded {
                total_matches
            } else {
                total_matches.min(COLLAPSED_TAG_LIMIT)
            };
            let toggle = (total_matches > COLLAPSED_TAG_LIMIT).then_some(if self.expanded {
                ExpandToggle::ShowLess
            } else {
                ExpandToggle::ShowMore
            });
            let chips = matches
                .into_iter()
                .take(visible)
                .map(|name| TagChip {
                    name: name.to_string(),
                    selected: selected == Some(name),
                })
                .collect();
            TagPickerBody::Chips { chips, toggle }
        };

        TagPickerView {
            search_query: self.search_query.clone(),
            search_enabled: !loading,
            show_clear: !self.search_query.is_empty(),
            total_matches,
            body,
        }
    }
}

/// Toggle `tag` against the current selection
///
/// Activating the selected tag clears the filter; any other tag replaces it.
#[must_use]
pub fn toggle_selection(current: Option<&str>, tag: &str) -> Option<String> {
    if current == Some(tag) {
        None
    } else {
        Some(tag.to_string())
    }
}
