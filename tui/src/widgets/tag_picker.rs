//! TagPicker Widget
//!
//! Label, search box and a flowing row of tag chips. Chips wrap onto as
//! many lines as the width requires; the expand toggle gets its own line.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use thought_core::{TagChip, TagPickerBody, TagPickerView};

use crate::controls::{Control, HitMap};
use crate::theme;

/// Label above the search box
pub const FILTER_LABEL: &str = "Filter by tag:";

/// Search box placeholder
pub const SEARCH_PLACEHOLDER: &str = "Search tags...";

/// Clear-search glyph
pub const CLEAR_GLYPH: &str = "×";

/// Label row and search row
const HEADER_ROWS: u16 = 2;

/// Chip position relative to the body origin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ChipSlot {
    x: u16,
    row: u16,
    width: u16,
}

fn chip_label(chip: &TagChip) -> String {
    format!(" {} ", chip.name)
}

/// Lay chips out left to right, wrapping at `width`
fn flow(chips: &[TagChip], width: u16) -> Vec<ChipSlot> {
    let mut slots = Vec::with_capacity(chips.len());
    let (mut x, mut row) = (0u16, 0u16);
    for chip in chips {
        let w = u16::try_from(chip_label(chip).width())
            .unwrap_or(u16::MAX)
            .min(width);
        if x > 0 && x.saturating_add(w) > width {
            row += 1;
            x = 0;
        }
        slots.push(ChipSlot { x, row, width: w });
        x = x.saturating_add(w + 1);
    }
    slots
}

/// Renders a [`TagPickerView`] and records chip hit regions
pub struct TagPicker<'a> {
    view: &'a TagPickerView,
    focused: Option<&'a Control>,
}

impl<'a> TagPicker<'a> {
    /// Picker for `view`, highlighting `focused`
    #[must_use]
    pub fn new(view: &'a TagPickerView, focused: Option<&'a Control>) -> Self {
        Self { view, focused }
    }

    /// Rows needed at `width`
    #[must_use]
    pub fn height(view: &TagPickerView, width: u16) -> u16 {
        let body = match &view.body {
            TagPickerBody::Chips { chips, toggle } => {
                let rows = flow(chips, width).last().map_or(0, |slot| slot.row + 1);
                rows + u16::from(toggle.is_some())
            }
            _ => 1,
        };
        HEADER_ROWS + body
    }

    fn is_focused(&self, control: &Control) -> bool {
        self.focused == Some(control)
    }

    fn render_search(&self, area: Rect, buf: &mut Buffer, hits: &mut HitMap) {
        let y = area.y + 1;
        let prompt = "> ";
        buf.set_string(area.x, y, prompt, theme::dim());
        let text_x = area.x + 2;
        let text_width = area.width.saturating_sub(4) as usize;

        if self.view.search_query.is_empty() {
            let style = if self.view.search_enabled {
                theme::dim()
            } else {
                ratatui::style::Style::default().fg(theme::DISABLED_GRAY)
            };
            buf.set_stringn(text_x, y, SEARCH_PLACEHOLDER, text_width, style);
        } else {
            let shown = format!("{}_", self.view.search_query);
            buf.set_stringn(
                text_x,
                y,
                visible_tail(&shown, text_width),
                text_width,
                ratatui::style::Style::default().fg(theme::CREAM),
            );
        }

        if self.view.show_clear && area.width >= 4 {
            let x = area.right() - 1;
            let clear = Control::ClearSearch;
            buf.set_string(x, y, CLEAR_GLYPH, theme::link(self.is_focused(&clear)));
            hits.push(Rect::new(x, y, 1, 1), clear);
        }
    }

    fn render_chips(
        &self,
        chips: &[TagChip],
        toggle: Option<thought_core::ExpandToggle>,
        body: Rect,
        buf: &mut Buffer,
        hits: &mut HitMap,
    ) {
        let slots = flow(chips, body.width);
        let mut next_row = 0;
        for (chip, slot) in chips.iter().zip(&slots) {
            let y = body.y + slot.row;
            if y >= body.bottom() {
                break;
            }
            let control = Control::Chip(chip.name.clone());
            let style = theme::chip(chip.selected, self.is_focused(&control));
            let x = body.x + slot.x;
            buf.set_stringn(x, y, chip_label(chip), slot.width as usize, style);
            hits.push(Rect::new(x, y, slot.width, 1), control);
            next_row = slot.row + 1;
        }

        if let Some(toggle) = toggle {
            let y = body.y + next_row;
            if y < body.bottom() {
                let label = toggle.label();
                let width = u16::try_from(label.width())
                    .unwrap_or(u16::MAX)
                    .min(body.width);
                let control = Control::Toggle;
                buf.set_stringn(
                    body.x,
                    y,
                    label,
                    width as usize,
                    theme::link(self.is_focused(&control)),
                );
                hits.push(Rect::new(body.x, y, width, 1), control);
            }
        }
    }
}

impl StatefulWidget for TagPicker<'_> {
    type State = HitMap;

    fn render(self, area: Rect, buf: &mut Buffer, hits: &mut Self::State) {
        if area.width < 6 || area.height < HEADER_ROWS {
            return;
        }

        buf.set_stringn(
            area.x,
            area.y,
            FILTER_LABEL,
            area.width as usize,
            theme::title(),
        );
        self.render_search(area, buf, hits);

        let body = Rect::new(
            area.x,
            area.y + HEADER_ROWS,
            area.width,
            area.height.saturating_sub(HEADER_ROWS),
        );
        if body.height == 0 {
            return;
        }

        match &self.view.body {
            TagPickerBody::Chips { chips, toggle } => {
                self.render_chips(chips, *toggle, body, buf, hits);
            }
            other => {
                if let Some(message) = other.message() {
                    buf.set_stringn(body.x, body.y, message, body.width as usize, theme::dim());
                }
            }
        }
    }
}

/// Longest suffix of `text` that fits in `width` columns
///
/// Keeps the cursor end of the query visible when it outgrows the box.
fn visible_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = idx;
    }
    &text[start..]
}
