//! Interactive Controls
//!
//! Every clickable or focusable thing on screen is a [`Control`]. Widgets
//! record where they drew each control in a [`HitMap`] during render; mouse
//! clicks and keyboard focus are both resolved against the last frame's map.

use ratatui::layout::{Position, Rect};

use thought_core::UserAction;

/// A control the user can activate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// A tag chip
    Chip(String),
    /// Show more / show less
    Toggle,
    /// The "×" in the search box
    ClearSearch,
    /// The refresh button
    Refresh,
}

impl Control {
    /// Action to route when activated
    #[must_use]
    pub fn action(&self) -> UserAction {
        match self {
            Self::Chip(name) => UserAction::ActivateTag(name.clone()),
            Self::Toggle => UserAction::ToggleExpanded,
            Self::ClearSearch => UserAction::ClearSearch,
            Self::Refresh => UserAction::Refresh,
        }
    }

    /// Whether Tab / arrow keys stop here
    ///
    /// The clear control is mouse and Ctrl+U only.
    #[must_use]
    pub fn focusable(&self) -> bool {
        !matches!(self, Self::ClearSearch)
    }
}

/// Screen regions of the controls drawn in the last frame, in draw order
#[derive(Clone, Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Control)>,
}

impl HitMap {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Record `control` at `area`
    pub fn push(&mut self, area: Rect, control: Control) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, control));
        }
    }

    /// Control under a cell, if any
    #[must_use]
    pub fn at(&self, column: u16, row: u16) -> Option<&Control> {
        let position = Position::new(column, row);
        self.regions
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, control)| control)
    }

    /// Where `control` was drawn
    #[must_use]
    pub fn area_of(&self, control: &Control) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, c)| c == control)
            .map(|(area, _)| *area)
    }

    /// Focus order: chips, then the toggle, then refresh
    #[must_use]
    pub fn focus_order(&self) -> Vec<&Control> {
        self.regions
            .iter()
            .map(|(_, control)| control)
            .filter(|control| control.focusable())
            .collect()
    }

    /// Control `step` places from `current` in focus order, wrapping
    ///
    /// With no current focus (or a focus that is no longer on screen),
    /// moving forward lands on the first control and backward on the last.
    #[must_use]
    pub fn step_focus(&self, current: Option<&Control>, step: isize) -> Option<Control> {
        let order = self.focus_order();
        if order.is_empty() {
            return None;
        }
        let len = order.len() as isize;
        let index = match current.and_then(|c| order.iter().position(|o| *o == c)) {
            Some(i) => (i as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        order.get(index as usize).map(|c| (*c).clone())
    }
}
