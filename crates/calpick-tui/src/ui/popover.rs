/// Popover hosting the date picker. It lives as long as focus stays inside
/// its dialog node.
use crate::calendar::{CALENDAR_HEIGHT, GRID_WIDTH};
use crate::dispatcher::Dispatcher;
use crate::actions::Action;
use crate::node_tree::{NodeId, NodeSpec, NodeTree, Role};
use crate::picker::{DatePicker, DatePickerProps, DatePickerState};
use crate::stores::picker_store::PickerState;
use calpick_core::{CalendarEvent, Locale};
use chrono::{Datelike, NaiveDateTime, Weekday};
use ratatui::{
    buffer::Buffer,
    crossterm::event::KeyEvent,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, StatefulWidget, Widget},
};

/// Borders plus one column of padding each side
pub const POPOVER_WIDTH: u16 = GRID_WIDTH + 4;
pub const POPOVER_HEIGHT: u16 = CALENDAR_HEIGHT + 2;

/// Picker props wired to the dispatcher
pub fn picker_props<'a>(
    state: &'a PickerState,
    dispatcher: &'a Dispatcher,
    block_weekends: bool,
) -> DatePickerProps<'a, CalendarEvent> {
    let props = DatePickerProps::new(&state.events)
        .selected(state.selected)
        .displayed_month(state.displayed.map(|d| d.date()))
        .on_change(move |ts| dispatcher.dispatch(Action::DateChanged(ts)))
        .on_month_preview(move |ts| dispatcher.dispatch(Action::MonthPreviewed(ts)));
    if block_weekends {
        props.is_invalid_date(|day| matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
    } else {
        props
    }
}

/// Area of a popover opened below `anchor`, kept on screen
pub fn popover_area(screen: Rect, anchor: Rect) -> Rect {
    let width = POPOVER_WIDTH.min(screen.width);
    let height = POPOVER_HEIGHT.min(screen.height);
    let x = anchor
        .x
        .min(screen.right().saturating_sub(width))
        .max(screen.x);
    let y = anchor
        .bottom()
        .min(screen.bottom().saturating_sub(height))
        .max(screen.y);
    Rect::new(x, y, width, height)
}

pub struct PickerPopover {
    tree: NodeTree,
    dialog: NodeId,
    picker: DatePickerState,
    area: Option<Rect>,
}

impl PickerPopover {
    /// Mount the dialog and its picker. Focus moves into the picker on the
    /// first render.
    pub fn open(tree: NodeTree, clock: fn() -> NaiveDateTime) -> Self {
        let dialog = tree.create(None, NodeSpec::element(Role::Dialog).label("Choose a date"));
        let mut picker = DatePickerState::new(tree.clone(), Some(dialog)).with_clock(clock);
        picker.request_focus();
        Self {
            tree,
            dialog,
            picker,
            area: None,
        }
    }

    pub fn picker(&self) -> &DatePickerState {
        &self.picker
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Whether focus has moved out of the dialog, which closes the popover
    pub fn focus_left(&self) -> bool {
        !self.tree.has_focus_within(self.dialog)
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        props: &DatePickerProps<'_, CalendarEvent>,
        locale: &Locale,
    ) -> bool {
        self.picker.handle_key_event(key, props, locale)
    }

    /// A click outside the popover takes focus away from it
    pub fn handle_click(
        &mut self,
        pos: Position,
        props: &DatePickerProps<'_, CalendarEvent>,
        locale: &Locale,
    ) -> bool {
        match self.area {
            Some(area) if area.contains(pos) => self.picker.handle_mouse_click(pos, props, locale),
            _ => {
                log::debug!("Click outside the date picker popover");
                self.tree.blur();
                false
            }
        }
    }

    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        props: &DatePickerProps<'_, CalendarEvent>,
        locale: &Locale,
    ) {
        self.area = Some(area);
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Pick a date ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);
        let inner = Rect {
            x: inner.x + 1,
            width: inner.width.saturating_sub(2),
            ..inner
        };
        DatePicker::new(props, locale).render(inner, buf, &mut self.picker);
    }
}

impl Drop for PickerPopover {
    fn drop(&mut self) {
        self.tree.remove(self.dialog);
    }
}
