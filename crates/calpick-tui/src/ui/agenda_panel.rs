/// Panel listing the events of the selected day
use crate::stores::picker_store::PickerState;
use calpick_core::Locale;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct AgendaPanel<'a> {
    state: &'a PickerState,
    locale: &'a Locale,
    is_focused: bool,
}

impl<'a> AgendaPanel<'a> {
    pub fn new(state: &'a PickerState, locale: &'a Locale, is_focused: bool) -> Self {
        Self {
            state,
            locale,
            is_focused,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let Some(selected) = self.state.selected else {
            return vec![Line::styled(
                "No date selected. Press o to pick one.",
                Style::default().fg(Color::DarkGray),
            )];
        };
        let agenda = self.state.agenda();
        let mut lines = vec![
            Line::styled(
                self.locale.format_long_date(selected.date()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                self.locale.day_label(selected.date(), agenda.len()),
                Style::default().fg(Color::DarkGray),
            ),
            Line::from(""),
        ];
        for event in agenda {
            let mut spans = vec![
                Span::styled(
                    event.date.format("%H:%M ").to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(event.title.clone()),
            ];
            if let Some(description) = &event.description {
                spans.push(Span::styled(
                    format!(" - {}", description),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Widget for AgendaPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.is_focused {
            Color::Cyan
        } else {
            Color::White
        };
        let title = if self.state.is_loading {
            " Agenda (Loading...) "
        } else {
            " Agenda "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color));
        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
