/// Month/year caption and the bracketed previous/next buttons
use crate::calendar::NavDirection;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

const CHEVRON_BACK: &str = "‹";
const CHEVRON_FORWARD: &str = "›";

/// Write `text` centred in a single row of `area`, clipped to its width
fn render_centered(text: &str, style: Style, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    let width = text.width() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let max_width = (area.right() - x) as usize;
    buf.set_stringn(x, area.y, text, max_width, style);
}

pub struct MonthLabel<'a> {
    text: &'a str,
}

impl<'a> MonthLabel<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for MonthLabel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        render_centered(self.text, style, area, buf);
    }
}

/// A previous/next month button. The chevron points the way the month
/// moves on screen, so right-to-left layouts flip it.
pub struct NavButton<'a> {
    direction: NavDirection,
    aria_label: &'a str,
    rtl: bool,
    focused: bool,
}

impl<'a> NavButton<'a> {
    pub fn new(direction: NavDirection, aria_label: &'a str) -> Self {
        Self {
            direction,
            aria_label,
            rtl: false,
            focused: false,
        }
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn aria_label(&self) -> &str {
        self.aria_label
    }

    pub fn glyph(&self) -> String {
        let chevron = match (self.direction, self.rtl) {
            (NavDirection::Prev, false) | (NavDirection::Next, true) => CHEVRON_BACK,
            (NavDirection::Next, false) | (NavDirection::Prev, true) => CHEVRON_FORWARD,
        };
        format!("[{}]", chevron)
    }
}

impl Widget for NavButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        render_centered(&self.glyph(), style, area, buf);
    }
}
