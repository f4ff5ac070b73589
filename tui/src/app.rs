//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - ViewComposer for orchestration
//! - HitMap for mouse and focus resolution
//!
//! The App never touches the network itself. Terminal events become
//! [`UserAction`]s for the composer, and every frame is drawn from a fresh
//! [`Screen`](thought_core::Screen) snapshot.

use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use thought_core::{QuoteBackend, UserAction, ViewComposer};

use crate::controls::{Control, HitMap};
use crate::theme;
use crate::widgets::{QuotePanel, TagPicker};

/// Header title
pub const TITLE: &str = "Golden Thought Generator";

/// Header subtitle
pub const SUBTITLE: &str = "Discover wisdom that inspires";

/// Footer credit
pub const FOOTER: &str = "Powered by Quotable API";

/// Widest the content column gets on large terminals
const MAX_CONTENT_WIDTH: u16 = 72;

/// Spinner and redraw cadence
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Main application state
pub struct App<B: QuoteBackend> {
    /// Is the app still running?
    running: bool,
    /// Quote, tags and filter orchestration
    view: ViewComposer<B>,
    /// Control regions from the last frame
    hits: HitMap,
    /// Keyboard focus
    focus: Option<Control>,
    /// Frame counter for the spinner
    tick: usize,
}

impl<B: QuoteBackend + 'static> App<B> {
    /// Create a new App around a composer that has not been mounted yet
    pub fn new(view: ViewComposer<B>) -> Self {
        Self {
            running: true,
            view,
            hits: HitMap::new(),
            focus: None,
            tick: 0,
        }
    }

    /// Whether the event loop should keep going
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The composer behind this app
    #[must_use]
    pub fn view(&self) -> &ViewComposer<B> {
        &self.view
    }

    /// Currently focused control
    #[must_use]
    pub fn focus(&self) -> Option<&Control> {
        self.focus.as_ref()
    }

    /// Control regions recorded by the last [`draw`](Self::draw)
    #[must_use]
    pub fn hits(&self) -> &HitMap {
        &self.hits
    }

    /// Start the tag load and the first quote fetch
    pub fn mount(&mut self) {
        // Both tasks report through the composer's watch slots
        let _ = self.view.mount();
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut quote_rx = self.view.quote_updates();
        let mut tags_rx = self.view.tag_updates();
        let mut ticker = tokio::time::interval(FRAME_DURATION);

        self.mount();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                Ok(()) = quote_rx.changed() => debug!("Quote panel changed"),
                Ok(()) = tags_rx.changed() => debug!("Tag list changed"),

                _ = ticker.tick() => self.tick = self.tick.wrapping_add(1),
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if ctrl => self.running = false,

            // Shortcuts
            KeyCode::Char('r') if ctrl => self.dispatch(UserAction::Refresh),
            KeyCode::F(5) => self.dispatch(UserAction::Refresh),
            KeyCode::Char('u') if ctrl => self.dispatch(UserAction::ClearSearch),

            // Focus
            KeyCode::Right | KeyCode::Tab => self.move_focus(1),
            KeyCode::Left | KeyCode::BackTab => self.move_focus(-1),
            KeyCode::Enter => self.activate_focus(),

            // Search box
            KeyCode::Backspace => self.dispatch(UserAction::SearchBackspace),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.dispatch(UserAction::SearchInput(c));
            }

            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(control) = self.hits.at(mouse.column, mouse.row).cloned() {
                if control.focusable() {
                    self.focus = Some(control.clone());
                }
                self.dispatch(control.action());
            }
        }
    }

    fn move_focus(&mut self, step: isize) {
        self.focus = self.hits.step_focus(self.focus.as_ref(), step);
    }

    fn activate_focus(&mut self) {
        let Some(control) = self.focus.clone() else {
            return;
        };
        // Focus can outlive its control when the chip list changes
        if self.hits.area_of(&control).is_some() {
            self.dispatch(control.action());
        }
    }

    fn dispatch(&mut self, action: UserAction) {
        debug!(?action, "User action");
        // Fetch results flow back through the quote panel slot
        let _ = self.view.handle(action);
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            self.draw(area, frame.buffer_mut());
        })?;
        Ok(())
    }

    /// Draw one frame into `buf`, recording control regions
    pub fn draw(&mut self, area: Rect, buf: &mut Buffer) {
        self.hits.clear();
        if area.width < 20 || area.height < 12 {
            buf.set_stringn(
                area.x,
                area.y,
                "Terminal too small",
                area.width as usize,
                theme::dim(),
            );
            return;
        }

        let screen = self.view.screen();
        let width = area.width.min(MAX_CONTENT_WIDTH);
        let column = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);
        let picker_height = TagPicker::height(&screen.picker, width);

        let [header, _, picker, _, quote, button, _, footer, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(picker_height),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(column);

        centered(buf, header, TITLE, theme::title());
        centered(
            buf,
            Rect::new(header.x, header.y + 1, header.width, 1),
            SUBTITLE,
            theme::dim(),
        );

        TagPicker::new(&screen.picker, self.focus.as_ref()).render(picker, buf, &mut self.hits);
        QuotePanel::new(&screen.quote, self.tick).render(quote, buf);

        let label = format!("  {}  ", screen.refresh.label());
        let focused = self.focus == Some(Control::Refresh);
        let region = centered(
            buf,
            button,
            &label,
            theme::button(screen.refresh.enabled, focused),
        );
        self.hits.push(region, Control::Refresh);

        centered(buf, footer, FOOTER, theme::dim());

        let filter = screen
            .selected_tag
            .as_deref()
            .map_or_else(String::new, |tag| format!(" | filter: {tag}"));
        let hint = format!(
            " Type to search | \u{2190}/\u{2192} focus | Enter select | Ctrl+R new thought | Esc quit{filter}"
        );
        let status = Rect::new(area.x, status.y, area.width, 1);
        buf.set_stringn(status.x, status.y, &hint, status.width as usize, theme::dim());
    }
}

/// Draw `text` centered on the first row of `area`; returns the drawn region
fn centered(buf: &mut Buffer, area: Rect, text: &str, style: ratatui::style::Style) -> Rect {
    let width = u16::try_from(text.width())
        .unwrap_or(u16::MAX)
        .min(area.width);
    let x = area.x + (area.width - width) / 2;
    buf.set_stringn(x, area.y, text, width as usize, style);
    Rect::new(x, area.y, width, area.height.min(1))
}
