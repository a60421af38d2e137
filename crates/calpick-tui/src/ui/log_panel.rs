/// Panel showing the application's own log lines
use crate::stores::app_logs_store::AppLogsState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct LogPanel<'a> {
    logs: &'a [String],
    scroll_offset: usize,
    is_focused: bool,
}

impl<'a> LogPanel<'a> {
    pub fn from_state(state: &'a AppLogsState, is_focused: bool) -> Self {
        Self {
            logs: &state.logs,
            scroll_offset: state.scroll_offset,
            is_focused,
        }
    }

    /// Indices of the lines that fit in `height` rows, newest at the bottom
    fn visible_range(&self, height: usize) -> (usize, usize) {
        let total = self.logs.len();
        let end = total.saturating_sub(self.scroll_offset);
        let start = end.saturating_sub(height);
        (start, end)
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.is_focused {
            Color::Cyan
        } else {
            Color::White
        };
        let inner_height = area.height.saturating_sub(2) as usize;
        let (start, end) = self.visible_range(inner_height);
        let title = if self.logs.len() > inner_height {
            format!(" Logs [{}/{}] ", end, self.logs.len())
        } else {
            String::from(" Logs ")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color));

        if self.logs.is_empty() {
            Paragraph::new("No logs yet...")
                .block(block)
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let lines: Vec<Line> = self.logs[start..end]
            .iter()
            .map(|log| Line::from(log.as_str()))
            .collect();
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
