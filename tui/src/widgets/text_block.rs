//! TextBlock Widget
//!
//! A borderless, bottom-anchored text region for conversation bubbles.
//! Scroll position is counted in lines from the bottom, so offset 0 always
//! shows the newest entry (follow mode).

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// Horizontal placement of an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Flush left
    Left,
    /// Flush right
    Right,
}

/// One entry (paragraph) of a text block
#[derive(Clone, Debug)]
pub struct Entry {
    /// Text, wrapped at render time
    pub text: String,
    /// Style of the bubble
    pub style: Style,
    /// Placement
    pub align: Align,
}

impl Entry {
    /// Create an entry
    pub fn new(text: impl Into<String>, style: Style, align: Align) -> Self {
        Self {
            text: text.into(),
            style,
            align,
        }
    }
}

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from bottom, 0 = newest)
    pub offset_from_bottom: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
    /// Visible height at the last render
    pub viewport: usize,
}

impl TextBlockState {
    /// Whether the view is pinned to the newest entry
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.offset_from_bottom == 0
    }

    /// Scroll towards older entries
    pub fn scroll_up(&mut self, lines: usize) {
        let max_offset = self.total_lines.saturating_sub(self.viewport);
        self.offset_from_bottom = (self.offset_from_bottom + lines).min(max_offset);
    }

    /// Scroll towards newer entries; reaching the bottom re-engages follow mode
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    /// Jump to the newest entry
    pub fn follow(&mut self) {
        self.offset_from_bottom = 0;
    }

    /// Forget everything (new conversation)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A borderless text block of wrapped entries
pub struct TextBlock<'a> {
    entries: &'a [Entry],
    /// Max bubble width as a percentage of the area
    max_width_pct: u16,
}

impl<'a> TextBlock<'a> {
    /// Create a block over `entries`
    #[must_use]
    pub fn new(entries: &'a [Entry]) -> Self {
        Self {
            entries,
            max_width_pct: 80,
        }
    }

    /// Limit bubble width to a percentage of the area
    #[must_use]
    pub fn max_width_pct(mut self, pct: u16) -> Self {
        self.max_width_pct = pct.clamp(10, 100);
        self
    }

    /// Wrap every entry into `(line, style, align)` rows, blank row between entries
    fn layout(&self, width: usize) -> Vec<(String, Style, Align)> {
        let mut rows = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                rows.push((String::new(), Style::default(), entry.align));
            }
            for line in entry.text.lines() {
                if line.is_empty() {
                    rows.push((String::new(), entry.style, entry.align));
                    continue;
                }
                for piece in wrap(line, width) {
                    rows.push((format!(" {piece} "), entry.style, entry.align));
                }
            }
        }
        rows
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let bubble_width =
            (usize::from(area.width) * usize::from(self.max_width_pct) / 100).max(4);
        let rows = self.layout(bubble_width.saturating_sub(2));

        // Keep the view still while scrolled up and new lines arrive
        if !state.is_following() && rows.len() > state.total_lines {
            state.offset_from_bottom += rows.len() - state.total_lines;
        }
        state.total_lines = rows.len();
        state.viewport = usize::from(area.height);

        let max_offset = state.total_lines.saturating_sub(state.viewport);
        state.offset_from_bottom = state.offset_from_bottom.min(max_offset);

        let end = state.total_lines - state.offset_from_bottom;
        let start = end.saturating_sub(state.viewport);

        for (i, (line, style, align)) in rows[start..end].iter().enumerate() {
            let Ok(dy) = u16::try_from(i) else { break };
            let y = area.y + dy;
            let line_width = u16::try_from(line.width()).unwrap_or(area.width).min(area.width);
            let x = match align {
                Align::Left => area.x,
                Align::Right => area.x + area.width - line_width,
            };
            buf.set_stringn(x, y, line, usize::from(area.width), *style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    fn entries(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::new(format!("msg {i}"), Style::default(), Align::Left))
            .collect()
    }

    #[test]
    fn test_follows_newest_entry() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();

        TextBlock::new(&entries(5)).render(area, &mut buf, &mut state);

        // 5 entries + 4 separators
        assert_eq!(state.total_lines, 9);
        assert!(row(&buf, 2).starts_with(" msg 4"));
    }

    #[test]
    fn test_scrolled_view_stays_put_when_content_grows() {
        let area = Rect::new(0, 0, 20, 3);
        let mut state = TextBlockState::default();
        TextBlock::new(&entries(5)).render(area, &mut Buffer::empty(area), &mut state);

        state.scroll_up(4);
        let mut buf = Buffer::empty(area);
        TextBlock::new(&entries(5)).render(area, &mut buf, &mut state);
        let before = row(&buf, 0);

        let mut buf = Buffer::empty(area);
        TextBlock::new(&entries(6)).render(area, &mut buf, &mut state);
        assert_eq!(row(&buf, 0), before);
        assert_eq!(state.offset_from_bottom, 6);

        state.scroll_down(100);
        assert!(state.is_following());
    }

    #[test]
    fn test_scroll_up_is_clamped() {
        let area = Rect::new(0, 0, 20, 4);
        let mut state = TextBlockState::default();
        TextBlock::new(&entries(2)).render(area, &mut Buffer::empty(area), &mut state);

        state.scroll_up(50);
        assert_eq!(state.offset_from_bottom, 0);
    }

    #[test]
    fn test_right_aligned_and_wrapped() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();
        let items = vec![Entry::new(
            "hello there my friend",
            Style::default(),
            Align::Right,
        )];

        TextBlock::new(&items).max_width_pct(60).render(area, &mut buf, &mut state);

        // 60% of 20 = 12 columns, 10 of them for text
        assert_eq!(state.total_lines, 3);
        assert_eq!(row(&buf, 0), format!("{} hello ", " ".repeat(13)));
        assert_eq!(row(&buf, 2), format!("{} friend ", " ".repeat(12)));
    }
}
