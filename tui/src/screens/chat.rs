//! Chat screen
//!
//! Header with the companion's portrait, the transcript as bubbles, and the
//! input box. Keys are routed by the app; this module only draws.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use companion_core::{ChatPhase, ChatView, CharacterProfile, Role, Studio};

use crate::theme;
use crate::widgets::portrait::{PortraitState, PortraitView};
use crate::widgets::text_block::{Align, Entry, TextBlock, TextBlockState};

const TYPING_FRAMES: [&str; 3] = ["●  ", "●● ", "●●●"];

/// Draw the chat screen
pub fn render(
    frame: &mut Frame,
    area: Rect,
    studio: &Studio,
    transcript: &mut TextBlockState,
    portrait: &mut PortraitState,
    tick: usize,
) {
    let Some(chat) = studio.chat() else {
        return;
    };
    let profile = studio.profile();

    let [header, body, input] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

    render_header(frame, header, profile, chat, portrait);

    let body = Block::default()
        .borders(Borders::TOP)
        .border_style(theme::border(false))
        .inner(body);
    let entries = entries(chat, tick);
    frame.render_stateful_widget(TextBlock::new(&entries).max_width_pct(75), body, transcript);

    render_input(frame, input, profile, chat);
}

/// Transcript bubbles plus the typing indicator
pub fn entries(chat: &ChatView, tick: usize) -> Vec<Entry> {
    let user = Style::default().fg(theme::TEXT).bg(theme::ACCENT_PURPLE);
    let model = Style::default().fg(theme::TEXT).bg(theme::PANEL);

    let mut entries: Vec<Entry> = chat
        .transcript()
        .iter()
        .map(|message| match message.role {
            Role::User => Entry::new(message.content.clone(), user, Align::Right),
            Role::Model => Entry::new(message.content.clone(), model, Align::Left),
        })
        .collect();
    if chat.is_typing() {
        entries.push(Entry::new(
            TYPING_FRAMES[tick % TYPING_FRAMES.len()],
            model.fg(theme::MUTED),
            Align::Left,
        ));
    }
    entries
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    profile: &CharacterProfile,
    chat: &ChatView,
    portrait: &mut PortraitState,
) {
    let [thumb, details] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(8), Constraint::Fill(1)])
        .areas(area);

    portrait.sync(profile.avatar.as_ref());
    frame.render_stateful_widget(PortraitView::new(&profile.initial()), thumb, portrait);

    let (status, color) = match chat.phase() {
        ChatPhase::Uninitialized | ChatPhase::Initializing => ("Connecting...", theme::MUTED),
        ChatPhase::Ready => ("Online", theme::ACCENT_PURPLE_LIGHT),
        ChatPhase::Degraded => ("Offline", theme::ERROR_RED),
    };
    let lines = vec![
        Line::from(Span::styled(
            profile.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(profile.relationship.label(), theme::label()),
            Span::styled(" • ", theme::hint()),
            Span::styled(status, Style::default().fg(color)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(details.x + 1, details.y + 1, details.width.saturating_sub(1), 2)
            .intersection(details),
    );
}

fn render_input(frame: &mut Frame, area: Rect, profile: &CharacterProfile, chat: &ChatView) {
    let line = if chat.input().is_empty() {
        Line::from(vec![
            Span::styled("▏", theme::label_focused()),
            Span::styled(format!("Message {}...", profile.name), theme::hint()),
        ])
    } else {
        // Keep the tail visible when the draft outgrows the box
        let width = usize::from(area.width.saturating_sub(4));
        let chars: Vec<char> = chat.input().chars().collect();
        let visible: String = chars[chars.len().saturating_sub(width)..].iter().collect();
        Line::from(vec![
            Span::raw(visible),
            Span::styled("▏", theme::label_focused()),
        ])
    };
    let send = if chat.can_send() { " ➤ " } else { "" };
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border(true))
                .title_bottom(Line::styled(send, theme::label_focused()).right_aligned()),
        ),
        area,
    );
}
