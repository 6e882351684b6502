//! Portrait Widget
//!
//! Draws the generated avatar with half-block cells: each terminal cell shows
//! two vertically stacked pixels (`▀` with the top pixel as foreground and the
//! bottom pixel as background). Without an avatar it shows the name initial.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::RgbImage;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget};
use thiserror::Error;

use companion_core::AvatarImage;

use crate::theme;

/// Upper half block
const HALF_BLOCK: &str = "▀";

/// Spinner frames shown while a generation is pending
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Why an avatar payload could not be shown
#[derive(Debug, Error)]
pub enum PortraitError {
    /// Payload was not valid base64
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Bytes were not a supported image
    #[error("unsupported image: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded avatar
#[derive(Clone, Debug)]
pub struct Portrait {
    pixels: RgbImage,
}

impl Portrait {
    /// Decode an avatar payload
    ///
    /// # Errors
    ///
    /// Returns [`PortraitError`] if the payload is not base64 or not an image.
    pub fn decode(avatar: &AvatarImage) -> Result<Self, PortraitError> {
        let bytes = STANDARD.decode(avatar.data.trim())?;
        let pixels = image::load_from_memory(&bytes)?.to_rgb8();
        Ok(Self { pixels })
    }

    /// Source dimensions in pixels
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Scale to `cols` x `rows` cells (two pixels per cell vertically)
    fn scaled(&self, cols: u16, rows: u16) -> RgbImage {
        let target = (u32::from(cols).max(1), u32::from(rows).max(1) * 2);
        if self.pixels.dimensions() == target {
            return self.pixels.clone();
        }
        image::imageops::resize(&self.pixels, target.0, target.1, FilterType::Triangle)
    }
}

/// Decoded avatar plus the last scaled rendition
///
/// Decoding and scaling only happen when the avatar or the area changes.
#[derive(Debug, Default)]
pub struct PortraitState {
    /// Payload the current decode came from
    source: Option<String>,
    decoded: Option<Portrait>,
    failed: bool,
    scaled: Option<((u16, u16), RgbImage)>,
}

impl PortraitState {
    /// Track the profile's avatar, decoding it when it changes
    pub fn sync(&mut self, avatar: Option<&AvatarImage>) {
        let Some(avatar) = avatar else {
            *self = Self::default();
            return;
        };
        if self.source.as_deref() == Some(avatar.data.as_str()) {
            return;
        }

        self.source = Some(avatar.data.clone());
        self.scaled = None;
        match Portrait::decode(avatar) {
            Ok(portrait) => {
                tracing::debug!(dimensions = ?portrait.dimensions(), "Decoded avatar");
                self.decoded = Some(portrait);
                self.failed = false;
            }
            Err(e) => {
                tracing::warn!(error = %e, mime = %avatar.mime_type, "Cannot preview avatar");
                self.decoded = None;
                self.failed = true;
            }
        }
    }

    /// Whether a decoded avatar is available
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.decoded.is_some()
    }

    fn cells(&mut self, cols: u16, rows: u16) -> Option<&RgbImage> {
        let portrait = self.decoded.as_ref()?;
        let stale = self
            .scaled
            .as_ref()
            .map_or(true, |(size, _)| *size != (cols, rows));
        if stale {
            self.scaled = Some(((cols, rows), portrait.scaled(cols, rows)));
        }
        self.scaled.as_ref().map(|(_, image)| image)
    }
}

/// Avatar preview box
pub struct PortraitView<'a> {
    initial: &'a str,
    busy: bool,
    tick: usize,
    focused: bool,
}

impl<'a> PortraitView<'a> {
    /// Preview showing `initial` when there is no image
    #[must_use]
    pub fn new(initial: &'a str) -> Self {
        Self {
            initial,
            busy: false,
            tick: 0,
            focused: false,
        }
    }

    /// Show the generation spinner at animation frame `tick`
    #[must_use]
    pub fn busy(mut self, busy: bool, tick: usize) -> Self {
        self.busy = busy;
        self.tick = tick;
        self
    }

    /// Highlight the border
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn placeholder(&self, failed: bool) -> Vec<Line<'static>> {
        let caption = if failed {
            "Preview unavailable"
        } else {
            "Avatar Preview"
        };
        vec![
            Line::styled(
                self.initial.to_string(),
                Style::default()
                    .fg(theme::ACCENT_PURPLE_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(caption, theme::hint()),
        ]
    }
}

impl StatefulWidget for PortraitView<'_> {
    type State = PortraitState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(pixels) = state.cells(inner.width, inner.height) {
            for row in 0..inner.height {
                for col in 0..inner.width {
                    let top = pixels.get_pixel(u32::from(col), u32::from(row) * 2);
                    let bottom = pixels.get_pixel(u32::from(col), u32::from(row) * 2 + 1);
                    buf[(inner.x + col, inner.y + row)]
                        .set_symbol(HALF_BLOCK)
                        .set_fg(Color::Rgb(top[0], top[1], top[2]))
                        .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
                }
            }
        } else {
            let lines = self.placeholder(state.failed);
            let height = u16::try_from(lines.len()).unwrap_or(inner.height);
            let top = inner.y + inner.height.saturating_sub(height) / 2;
            let centered = Rect::new(inner.x, top, inner.width, height.min(inner.height));
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(centered, buf);
        }

        if self.busy {
            let frame = SPINNER[self.tick % SPINNER.len()];
            let label = format!(" {frame} Generating... ");
            let y = inner.y + inner.height.saturating_sub(1);
            let width = u16::try_from(label.chars().count()).unwrap_or(inner.width);
            let x = inner.x + inner.width.saturating_sub(width) / 2;
            buf.set_stringn(
                x,
                y,
                &label,
                usize::from(inner.width),
                Style::default().fg(theme::TEXT).bg(theme::PANEL),
            );
        }
    }
}
