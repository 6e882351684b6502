//! Theme and Colors
//!
//! Night-time palette: slate backgrounds with purple and pink accents.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Base Palette
// ============================================================================

/// Page background
pub const BACKGROUND: Color = Color::Rgb(2, 6, 23);

/// Panel / bubble background
pub const PANEL: Color = Color::Rgb(30, 41, 59);

/// Borders and separators
pub const BORDER: Color = Color::Rgb(51, 65, 85);

/// Main text
pub const TEXT: Color = Color::Rgb(226, 232, 240);

/// Secondary text (labels, taglines)
pub const MUTED: Color = Color::Rgb(148, 163, 184);

/// Hints and placeholders
pub const DIM_GRAY: Color = Color::Rgb(100, 116, 139);

// ============================================================================
// Accents
// ============================================================================

/// Primary accent (focus, user bubbles)
pub const ACCENT_PURPLE: Color = Color::Rgb(147, 51, 234);

/// Lighter accent for text on dark backgrounds
pub const ACCENT_PURPLE_LIGHT: Color = Color::Rgb(192, 132, 252);

/// Secondary accent (headline, hearts)
pub const ACCENT_PINK: Color = Color::Rgb(236, 72, 153);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(248, 113, 113);

// ============================================================================
// Styles
// ============================================================================

/// Base style for every screen
#[must_use]
pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BACKGROUND)
}

/// Field label
#[must_use]
pub fn label() -> Style {
    Style::default().fg(MUTED)
}

/// Focused field label
#[must_use]
pub fn label_focused() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE_LIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Hint / placeholder text
#[must_use]
pub fn hint() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Border of a focused or unfocused box
#[must_use]
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT_PURPLE)
    } else {
        Style::default().fg(BORDER)
    }
}

/// Button; disabled buttons are dimmed
#[must_use]
pub fn button(focused: bool, enabled: bool) -> Style {
    match (enabled, focused) {
        (false, _) => Style::default().fg(DIM_GRAY).bg(PANEL),
        (true, true) => Style::default()
            .fg(Color::White)
            .bg(ACCENT_PURPLE)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(TEXT).bg(PANEL),
    }
}
