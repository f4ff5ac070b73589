//! Theme and Colors
//!
//! Golden Thought's palette: warm golds on the terminal's own background,
//! with a muted gray for secondary text.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Golden Palette
// ============================================================================

/// Title and accents
pub const GOLD: Color = Color::Rgb(234, 179, 8);

/// Selected chip background
pub const AMBER: Color = Color::Rgb(217, 119, 6);

/// Quote text
pub const CREAM: Color = Color::Rgb(254, 243, 199);

/// Unselected chip text
pub const SAND: Color = Color::Rgb(214, 188, 130);

// ============================================================================
// UI Colors
// ============================================================================

/// Secondary text, placeholders, footer
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

/// Error message
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Disabled controls
pub const DISABLED_GRAY: Color = Color::Rgb(80, 80, 80);

// ============================================================================
// Styles
// ============================================================================

/// Header title
#[must_use]
pub fn title() -> Style {
    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
}

/// Secondary text
#[must_use]
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// A tag chip
#[must_use]
pub fn chip(selected: bool, focused: bool) -> Style {
    let base = if selected {
        Style::default().fg(Color::Black).bg(AMBER)
    } else {
        Style::default().fg(SAND)
    };
    focus(base, focused)
}

/// The refresh button
#[must_use]
pub fn button(enabled: bool, focused: bool) -> Style {
    let base = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(GOLD)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DISABLED_GRAY)
    };
    focus(base, focused)
}

/// Link-like controls (toggle, clear)
#[must_use]
pub fn link(focused: bool) -> Style {
    focus(
        Style::default().fg(GOLD).add_modifier(Modifier::UNDERLINED),
        focused,
    )
}

fn focus(style: Style, focused: bool) -> Style {
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}
