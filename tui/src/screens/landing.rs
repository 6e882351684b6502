//! Landing screen

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme;

/// Headline
pub const HEADLINE: &str = "Create Your Dream Companion";

const TAGLINE: &str = "Design every detail of your perfect partner. From personality to \
                       appearance, bring your ideal relationship to life with advanced AI.";

const FEATURES: [(&str, &str); 3] = [
    ("Custom Personality", "Define how they think and feel."),
    ("Visual Generation", "See your companion come to life."),
    ("Deep Connection", "Engage in meaningful conversations."),
];

/// Draw the landing screen
pub fn render(frame: &mut Frame, area: Rect) {
    let [_, hero, _, features, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .areas(area);

    let hero_text = vec![
        Line::styled("♥", Style::default().fg(theme::ACCENT_PINK)),
        Line::default(),
        Line::from(vec![
            Span::styled("Create Your ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                "Dream Companion",
                Style::default()
                    .fg(theme::ACCENT_PINK)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
        Line::styled(TAGLINE, theme::label()),
        Line::default(),
        Line::styled("  Start Creating →  ", theme::button(true, true)),
    ];
    frame.render_widget(
        Paragraph::new(hero_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        centered(hero, 80),
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(centered(features, 96));
    for ((title, blurb), column) in FEATURES.iter().zip(columns.iter()) {
        let text = vec![
            Line::styled(*title, Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)),
            Line::styled(*blurb, theme::hint()),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(theme::border(false)),
                ),
            *column,
        );
    }
}

/// Horizontally centered slice of `area`, at most `max_width` columns
fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}
