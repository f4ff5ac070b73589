//! QuotePanel Widget
//!
//! A borderless panel showing exactly one of: a spinner, the fetch error,
//! the current quote, or the empty-state hint. Text is wrapped to the
//! panel width and centered horizontally and vertically.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use thought_core::{QuoteDisplay, EMPTY_QUOTE_MESSAGE};

use crate::theme;

/// Braille spinner, one frame per tick
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Horizontal padding on each side of wrapped text
const PADDING: u16 = 2;

/// Renders a [`QuoteDisplay`]
pub struct QuotePanel<'a> {
    display: &'a QuoteDisplay,
    tick: usize,
}

impl<'a> QuotePanel<'a> {
    /// Panel for `display`; `tick` advances the spinner
    #[must_use]
    pub fn new(display: &'a QuoteDisplay, tick: usize) -> Self {
        Self { display, tick }
    }

    fn wrapped(text: &str, width: usize, style: Style, out: &mut Vec<(String, Style)>) {
        for line in wrap(text, width) {
            out.push((line.into_owned(), style));
        }
    }

    /// Lines to draw at `width`, before vertical centering
    fn lines(&self, width: usize) -> Vec<(String, Style)> {
        let mut lines = Vec::new();
        match self.display {
            QuoteDisplay::Loading => {
                let frame = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
                lines.push((frame.to_string(), Style::default().fg(theme::GOLD)));
            }
            QuoteDisplay::Error(message) => {
                Self::wrapped(
                    message,
                    width,
                    Style::default().fg(theme::ERROR_RED),
                    &mut lines,
                );
            }
            QuoteDisplay::Content(quote) => {
                Self::wrapped(
                    &format!("\u{201c}{}\u{201d}", quote.content),
                    width,
                    Style::default()
                        .fg(theme::CREAM)
                        .add_modifier(Modifier::ITALIC),
                    &mut lines,
                );
                lines.push((String::new(), Style::default()));
                lines.push((quote.attribution(), Style::default().fg(theme::GOLD)));
                if quote.has_tags() {
                    let tags = quote
                        .tags
                        .iter()
                        .map(|t| format!("#{t}"))
                        .collect::<Vec<_>>()
                        .join("  ");
                    Self::wrapped(&tags, width, theme::dim(), &mut lines);
                }
            }
            QuoteDisplay::Empty => {
                Self::wrapped(EMPTY_QUOTE_MESSAGE, width, theme::dim(), &mut lines);
            }
        }
        lines
    }
}

impl Widget for QuotePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_width = area.width.saturating_sub(PADDING * 2);
        if inner_width < 4 || area.height == 0 {
            return;
        }

        let lines = self.lines(inner_width as usize);
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let top = area.y + area.height.saturating_sub(height) / 2;

        for (i, (line, style)) in lines.iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            let y = top + offset;
            if y >= area.bottom() {
                break;
            }
            let width = u16::try_from(line.width())
                .unwrap_or(u16::MAX)
                .min(inner_width);
            let x = area.x + PADDING + (inner_width - width) / 2;
            buf.set_stringn(x, y, line, inner_width as usize, *style);
        }
    }
}
