/// Layout manager for the picker application
use crate::actions::PanelId;
use crate::dispatcher::Dispatcher;
use crate::stores::{AppLogsStore, PickerStore, UIStore};
use crate::ui::popover::{picker_props, popover_area};
use crate::ui::{AgendaPanel, LogPanel, PickerPopover};
use calpick_core::Locale;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Where the selected value is shown in the header; the popover opens
/// below it
pub fn header_anchor(area: Rect) -> Rect {
    Rect::new(area.x + 10, area.y + 1, 30.min(area.width), 1)
}

/// Everything the layout needs besides the stores
pub struct RenderContext<'a> {
    pub locale: &'a Locale,
    pub dispatcher: &'a Dispatcher,
    pub block_weekends: bool,
}

/// Render the complete application layout
pub fn render_layout(
    frame: &mut Frame,
    ui_store: &UIStore,
    picker_store: &PickerStore,
    app_logs_store: &AppLogsStore,
    popover: Option<&mut PickerPopover>,
    ctx: &RenderContext<'_>,
) {
    let area = frame.area();

    // Header | Content | Footer
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, vertical_chunks[0], ui_store, picker_store, ctx.locale);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(vertical_chunks[1]);

    let ui_state = ui_store.get_state();
    let picker_state = picker_store.get_state();
    AgendaPanel::new(
        &picker_state,
        ctx.locale,
        ui_state.focused_panel == PanelId::Agenda,
    )
    .render(content_chunks[0], frame.buffer_mut());

    let logs_state = app_logs_store.get_state();
    LogPanel::from_state(&logs_state, ui_state.focused_panel == PanelId::Logs)
        .render(content_chunks[1], frame.buffer_mut());

    render_footer(frame, vertical_chunks[2], ui_store, picker_state.is_open);

    if let Some(popover) = popover {
        let props = picker_props(&picker_state, ctx.dispatcher, ctx.block_weekends);
        let popover_rect = popover_area(area, header_anchor(vertical_chunks[0]));
        popover.render(popover_rect, frame.buffer_mut(), &props, ctx.locale);
    }

    if ui_state.show_help {
        render_help(frame, area);
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    ui_store: &UIStore,
    picker_store: &PickerStore,
    locale: &Locale,
) {
    let ui_state = ui_store.get_state();
    let picker_state = picker_store.get_state();

    let selected = picker_state
        .selection_string()
        .unwrap_or_else(|| String::from("(none)"));

    let (status, status_color) = if let Some(err) = &ui_state.error_message {
        (err.clone(), Color::Red)
    } else if picker_state.is_loading {
        (String::from("Loading events..."), Color::Yellow)
    } else {
        (
            format!("{} events", picker_state.events.len()),
            Color::Green,
        )
    };

    let header_text = Line::from(vec![
        Span::styled(
            " CALPICK ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(format!("{:<19}", selected), Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::raw(format!("{} ({:?})", locale.code(), locale.direction())),
        Span::raw(" | "),
        Span::styled(status, Style::default().fg(status_color)),
    ]);

    Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL))
        .render(area, frame.buffer_mut());
}

fn render_footer(frame: &mut Frame, area: Rect, ui_store: &UIStore, picker_open: bool) {
    let ui_state = ui_store.get_state();

    let help_text = if ui_state.show_help {
        "Press ? to hide help"
    } else if picker_open {
        "Arrows:Move | PgUp/PgDn:Month | Enter:Pick | Tab:Controls | Esc:Close"
    } else {
        match ui_state.focused_panel {
            PanelId::Agenda => "q:Quit | o:Open picker | Tab:Panel | ?:Help",
            PanelId::Logs => "q:Quit | o:Open picker | Tab:Panel | j/k:Scroll | ?:Help",
        }
    };

    let footer_text = Line::from(vec![Span::raw(" "), Span::raw(help_text)]);

    Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL))
        .render(area, frame.buffer_mut());
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let lines = vec![
        Line::from("o / Enter     open the date picker"),
        Line::from("Esc           close the picker"),
        Line::from("Arrows        move between days"),
        Line::from("Home / End    start / end of week"),
        Line::from("PgUp / PgDn   previous / next month"),
        Line::from("Enter / Space pick the highlighted day"),
        Line::from("Tab           cycle picker controls or panels"),
        Line::from("q             quit and print the selection"),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .render(popup, frame.buffer_mut());
}

/// Helper function to create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
