//! Creation screen
//!
//! A keyboard-driven form over the profile. The form only tracks which field
//! has focus; every value lives in the studio's profile and every change goes
//! through a [`ProfileEdit`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use companion_core::{Age, CharacterProfile, ProfileEdit, Studio, PERSONALITY_PRESETS};

use crate::theme;
use crate::widgets::portrait::{PortraitState, PortraitView};

/// Focusable controls, in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Name text input
    Name,
    /// Relationship selector
    Relationship,
    /// Age slider
    Age,
    /// Personality presets + free text
    Personality,
    /// Hair color selector
    HairColor,
    /// Hair style selector
    HairStyle,
    /// Skin tone selector
    SkinTone,
    /// Body type selector
    BodyType,
    /// Generate / Regenerate avatar button
    Generate,
    /// Start Relationship button
    Finish,
}

impl Field {
    /// Tab order
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::Relationship,
        Field::Age,
        Field::Personality,
        Field::HairColor,
        Field::HairStyle,
        Field::SkinTone,
        Field::BodyType,
        Field::Generate,
        Field::Finish,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next control, wrapping
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous control, wrapping
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Relationship => "Relationship",
            Field::Age => "Age",
            Field::Personality => "Personality",
            Field::HairColor => "Hair Color",
            Field::HairStyle => "Hair Style",
            Field::SkinTone => "Body Color (Skin)",
            Field::BodyType => "Body Style",
            Field::Generate | Field::Finish => "",
        }
    }
}

/// Focus state of the creation form
#[derive(Debug)]
pub struct CreateForm {
    focus: Field,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self { focus: Field::Name }
    }
}

impl CreateForm {
    /// Form with focus on the name field
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Focused control
    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Route a key press to the studio
    pub fn handle_key(&mut self, key: KeyEvent, studio: &mut Studio) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Left => self.cycle(studio, -1),
            KeyCode::Right => self.cycle(studio, 1),
            KeyCode::Enter => match self.focus {
                Field::Generate => {
                    studio.request_avatar();
                }
                Field::Finish => {
                    studio.finish();
                }
                _ => self.focus = self.focus.next(),
            },
            KeyCode::Backspace => {
                let profile = studio.profile();
                let edit = match self.focus {
                    Field::Name => Some(ProfileEdit::Name(without_last(&profile.name))),
                    Field::Personality => {
                        Some(ProfileEdit::Personality(without_last(&profile.personality)))
                    }
                    _ => None,
                };
                if let Some(edit) = edit {
                    studio.edit(edit);
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let profile = studio.profile();
                let edit = match self.focus {
                    Field::Name => Some(ProfileEdit::Name(format!("{}{c}", profile.name))),
                    Field::Personality => Some(ProfileEdit::Personality(format!(
                        "{}{c}",
                        profile.personality
                    ))),
                    _ => None,
                };
                if let Some(edit) = edit {
                    studio.edit(edit);
                }
            }
            _ => {}
        }
    }

    /// Left/Right on a selector
    fn cycle(&self, studio: &mut Studio, direction: i16) {
        let profile = studio.profile();
        let forward = direction > 0;
        let edit = match self.focus {
            Field::Relationship => ProfileEdit::Relationship(if forward {
                profile.relationship.next()
            } else {
                profile.relationship.prev()
            }),
            Field::Age => ProfileEdit::Age(profile.age.step(direction)),
            Field::Personality => {
                let count = PERSONALITY_PRESETS.len();
                let index = match (profile.preset_index(), forward) {
                    (Some(i), true) => (i + 1) % count,
                    (Some(i), false) => (i + count - 1) % count,
                    (None, true) => 0,
                    (None, false) => count - 1,
                };
                ProfileEdit::Personality(PERSONALITY_PRESETS[index].to_string())
            }
            Field::HairColor => ProfileEdit::HairColor(if forward {
                profile.hair_color.next()
            } else {
                profile.hair_color.prev()
            }),
            Field::HairStyle => ProfileEdit::HairStyle(if forward {
                profile.hair_style.next()
            } else {
                profile.hair_style.prev()
            }),
            Field::SkinTone => ProfileEdit::SkinTone(if forward {
                profile.skin_tone.next()
            } else {
                profile.skin_tone.prev()
            }),
            Field::BodyType => ProfileEdit::BodyType(if forward {
                profile.body_type.next()
            } else {
                profile.body_type.prev()
            }),
            Field::Name | Field::Generate | Field::Finish => return,
        };
        studio.edit(edit);
    }
}

fn without_last(text: &str) -> String {
    let mut text = text.to_string();
    text.pop();
    text
}

// ============================================================================
// Rendering
// ============================================================================

/// Draw the creation screen
pub fn render(
    frame: &mut Frame,
    area: Rect,
    studio: &Studio,
    form: &CreateForm,
    portrait: &mut PortraitState,
    tick: usize,
) {
    let Some(creation) = studio.creation() else {
        return;
    };
    let profile = studio.profile();

    let [title, body] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Fill(1)])
        .areas(area);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ✦ ", Style::default().fg(theme::ACCENT_PURPLE_LIGHT)),
            Span::styled(
                "Design Your Companion",
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])),
        title,
    );

    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .areas(body);

    render_fields(frame, left, profile, form.focus);

    let [preview, generate, error, _, finish, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Max(20),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(right);

    portrait.sync(profile.avatar.as_ref());
    frame.render_stateful_widget(
        PortraitView::new(&profile.initial())
            .busy(creation.is_generating(), tick)
            .focused(form.focus == Field::Generate),
        preview,
        portrait,
    );

    let generate_label = if profile.avatar.is_some() {
        "  ⟳ Regenerate  "
    } else {
        "  ✦ Generate Avatar  "
    };
    frame.render_widget(
        Paragraph::new(Line::styled(
            generate_label,
            theme::button(form.focus == Field::Generate, !creation.is_generating()),
        ))
        .centered(),
        generate,
    );

    if let Some(message) = creation.error() {
        frame.render_widget(
            Paragraph::new(Line::styled(message, Style::default().fg(theme::ERROR_RED)))
                .centered()
                .wrap(Wrap { trim: true }),
            error,
        );
    }

    frame.render_widget(
        Paragraph::new(Line::styled(
            "  Start Relationship ♥  ",
            theme::button(form.focus == Field::Finish, profile.can_finish()),
        ))
        .centered(),
        finish,
    );
}

fn render_fields(frame: &mut Frame, area: Rect, profile: &CharacterProfile, focus: Field) {
    let mut constraints = vec![Constraint::Length(3); 8];
    constraints.push(Constraint::Fill(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let fields = [
        (Field::Name, text_value(&profile.name, "e.g. Luna")),
        (Field::Relationship, choice(profile.relationship.label())),
        (Field::Age, age_slider(profile.age)),
        (
            Field::Personality,
            text_value(&profile.personality, "Pick a preset or type your own..."),
        ),
        (Field::HairColor, choice(profile.hair_color.label())),
        (Field::HairStyle, choice(profile.hair_style.label())),
        (Field::SkinTone, choice(profile.skin_tone.label())),
        (Field::BodyType, choice(profile.body_type.label())),
    ];

    for ((field, value), row) in fields.into_iter().zip(rows.iter()) {
        let focused = field == focus;
        let title_style = if focused {
            theme::label_focused()
        } else {
            theme::label()
        };
        let mut value = value;
        if focused && matches!(field, Field::Name | Field::Personality) {
            value.spans.push(Span::styled("▏", theme::label_focused()));
        }
        frame.render_widget(
            Paragraph::new(value).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border(focused))
                    .title(Span::styled(format!(" {} ", field.label()), title_style)),
            ),
            *row,
        );
    }
}

fn text_value(value: &str, placeholder: &'static str) -> Line<'static> {
    if value.is_empty() {
        Line::styled(placeholder, theme::hint())
    } else {
        Line::raw(value.to_string())
    }
}

fn choice(label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("‹ ", theme::hint()),
        Span::raw(label),
        Span::styled(" ›", theme::hint()),
    ])
}

fn age_slider(age: Age) -> Line<'static> {
    const TRACK: usize = 24;
    let span = usize::from(Age::MAX - Age::MIN);
    let filled = usize::from(age.years() - Age::MIN) * TRACK / span;
    Line::from(vec![
        Span::styled(
            format!("{:>2} ", age.years()),
            Style::default()
                .fg(theme::ACCENT_PURPLE_LIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("━".repeat(filled), Style::default().fg(theme::ACCENT_PURPLE)),
        Span::styled("●", Style::default().fg(theme::TEXT)),
        Span::styled("─".repeat(TRACK - filled), theme::hint()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::{HairColor, Relationship, ScriptedBackend};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn studio_on_create() -> Studio {
        let mut studio = Studio::new(Arc::new(ScriptedBackend::new()));
        studio.start();
        studio
    }

    #[test]
    fn test_focus_wraps() {
        assert_eq!(Field::Name.prev(), Field::Finish);
        assert_eq!(Field::Finish.next(), Field::Name);
        assert_eq!(Field::Age.next(), Field::Personality);
    }

    #[test]
    fn test_typing_edits_name_and_personality() {
        let mut studio = studio_on_create();
        let mut form = CreateForm::new();

        for c in "Lunx".chars() {
            form.handle_key(key(KeyCode::Char(c)), &mut studio);
        }
        form.handle_key(key(KeyCode::Backspace), &mut studio);
        form.handle_key(key(KeyCode::Char('a')), &mut studio);
        assert_eq!(studio.profile().name, "Luna");

        // Enter on a text field moves on
        form.handle_key(key(KeyCode::Enter), &mut studio);
        assert_eq!(form.focus(), Field::Relationship);

        // Typing on a selector does nothing
        form.handle_key(key(KeyCode::Char('z')), &mut studio);
        assert_eq!(studio.profile().name, "Luna");
        assert_eq!(studio.profile().relationship, Relationship::Girlfriend);
    }

    #[test]
    fn test_selectors_cycle() {
        let mut studio = studio_on_create();
        let mut form = CreateForm::new();

        form.handle_key(key(KeyCode::Down), &mut studio);
        form.handle_key(key(KeyCode::Right), &mut studio);
        assert_eq!(studio.profile().relationship, Relationship::Boyfriend);

        form.handle_key(key(KeyCode::Down), &mut studio);
        form.handle_key(key(KeyCode::Left), &mut studio);
        assert_eq!(studio.profile().age, Age::new(23));

        form.handle_key(key(KeyCode::Down), &mut studio);
        form.handle_key(key(KeyCode::Right), &mut studio);
        assert_eq!(studio.profile().personality, PERSONALITY_PRESETS[0]);
        form.handle_key(key(KeyCode::Left), &mut studio);
        assert_eq!(studio.profile().personality, PERSONALITY_PRESETS[5]);

        form.handle_key(key(KeyCode::Down), &mut studio);
        form.handle_key(key(KeyCode::Left), &mut studio);
        assert_eq!(studio.profile().hair_color, HairColor::Black);
    }

    #[test]
    fn test_age_slider_bounds() {
        let low = age_slider(Age::new(Age::MIN));
        let high = age_slider(Age::new(Age::MAX));
        assert_eq!(low.spans[1].content, "");
        assert_eq!(high.spans[3].content, "");
    }
}
