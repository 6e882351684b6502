//! Main Application
//!
//! The App struct owns the studio and the terminal-only state around it:
//! - Event loop (keyboard, resize, frame tick, backend completions)
//! - Creation form focus and transcript scroll position
//! - Cached avatar decode
//!
//! All domain state lives in [`Studio`]; the app maps keys to studio
//! operations and draws from its accessors.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};

use companion_core::{Screen, Studio};

use crate::screens::{self, CreateForm};
use crate::theme;
use crate::widgets::portrait::PortraitState;
use crate::widgets::text_block::TextBlockState;

/// Animation frame length
const FRAME: Duration = Duration::from_millis(120);

/// Main application state
pub struct App {
    /// Domain state and backend plumbing
    studio: Studio,
    /// Is the app still running?
    running: bool,
    /// Creation form focus
    form: CreateForm,
    /// Transcript scroll position (lines from bottom, 0 = latest)
    transcript: TextBlockState,
    /// Decoded avatar, shared by the preview and the chat header
    portrait: PortraitState,
    /// Animation counter for spinners
    tick: usize,
}

impl App {
    /// Wrap a studio
    #[must_use]
    pub fn new(studio: Studio) -> Self {
        Self {
            studio,
            running: true,
            form: CreateForm::new(),
            transcript: TextBlockState::default(),
            portrait: PortraitState::default(),
            tick: 0,
        }
    }

    /// The studio being driven
    #[must_use]
    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    /// Mutable studio access (tests settle completions through this)
    pub fn studio_mut(&mut self) -> &mut Studio {
        &mut self.studio
    }

    /// Is the app still running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Creation form focus
    #[must_use]
    pub fn form(&self) -> &CreateForm {
        &self.form
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(FRAME);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let busy = self.studio.in_flight() > 0;

            tokio::select! {
                biased;

                maybe_event = events.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        self.running = false;
                    }
                    None => self.running = false,
                },

                applied = self.studio.wait_for_completion(), if busy => {
                    if applied {
                        tracing::trace!(in_flight = self.studio.in_flight(), "Completion applied");
                    }
                }

                _ = ticker.tick() => self.tick(),
            }

            // Anything else that finished meanwhile lands in the same frame
            self.studio.poll();

            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Advance animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match self.studio.screen() {
            Screen::Landing => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.running = false,
                KeyCode::Enter => {
                    self.studio.start();
                }
                _ => {}
            },
            Screen::Create => {
                self.form.handle_key(key, &mut self.studio);
                if self.studio.screen() == Screen::Chat {
                    self.transcript.reset();
                }
            }
            Screen::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        let page = (self.transcript.viewport / 2).max(1);
        match key.code {
            KeyCode::Esc => {
                self.studio.back();
                self.transcript.reset();
            }
            KeyCode::Enter => {
                if self.studio.submit_turn() {
                    self.transcript.follow();
                }
            }
            KeyCode::Backspace => {
                if let Some(chat) = self.studio.chat_mut() {
                    chat.pop_input();
                }
            }
            KeyCode::PageUp => self.transcript.scroll_up(page),
            KeyCode::PageDown => self.transcript.scroll_down(page),
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.follow();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if let Some(chat) = self.studio.chat_mut() {
                    chat.push_input(c);
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw the current screen plus the status line
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let [main, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1)])
            .areas(area);
        let main = Rect::new(
            main.x + 1,
            main.y,
            main.width.saturating_sub(2),
            main.height,
        );

        match self.studio.screen() {
            Screen::Landing => screens::landing::render(frame, main),
            Screen::Create => screens::create::render(
                frame,
                main,
                &self.studio,
                &self.form,
                &mut self.portrait,
                self.tick,
            ),
            Screen::Chat => screens::chat::render(
                frame,
                main,
                &self.studio,
                &mut self.transcript,
                &mut self.portrait,
                self.tick,
            ),
        }

        self.draw_status(frame, status);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.studio.screen() {
            Screen::Landing => "Enter start | Esc quit",
            Screen::Create => "Tab/↑↓ move | ←→ change | Enter select | Ctrl-C quit",
            Screen::Chat => "Enter send | PgUp/PgDn scroll | Esc back | Ctrl-C quit",
        };
        let mut spans = vec![
            Span::styled(format!(" {} ", self.studio.backend_name()), theme::label()),
            Span::styled("| ", theme::hint()),
            Span::styled(hints, theme::hint()),
        ];
        if self.studio.screen() == Screen::Chat && !self.transcript.is_following() {
            spans.push(Span::styled(
                format!(
                    " [^{} lines - PgDn to scroll]",
                    self.transcript.offset_from_bottom
                ),
                Style::default().fg(theme::ACCENT_PINK),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
