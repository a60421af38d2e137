/// Single-month calendar built on ratatui's `Monthly` widget.
///
/// `Monthly` only knows how to draw a grid of day numbers. This module adds
/// what a calendar component needs on top of it: navigation controls, a day
/// cursor driven by the keyboard, mouse hit-testing, and a set of nodes in
/// the [`NodeTree`] describing the grid (cells, nav buttons and a focus
/// region). Hosts customise it through [`CalendarHooks`].
mod state;

pub use state::{CalendarLayout, CalendarState};

use crate::node_tree::{NodeId, NodeTree};
use calpick_core::TextDirection;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{
        StatefulWidget, Widget,
        calendar::{DateStyler, Monthly},
    },
};
use std::cell::RefCell;
use time::Date;
use unicode_width::UnicodeWidthStr;

/// Columns taken by one day: a gutter plus two digits
pub const CELL_WIDTH: u16 = 3;
pub const GRID_WIDTH: u16 = 7 * CELL_WIDTH;
pub const MAX_WEEKS: u16 = 6;
/// Header row, weekday row and the weeks
pub const CALENDAR_HEIGHT: u16 = 2 + MAX_WEEKS;
pub const NAV_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

/// What the calendar knows about a day when asking for its style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayModifiers {
    pub selected: bool,
    /// keyboard cursor sits on this day
    pub cursor: bool,
    /// the day's cell holds focus
    pub focused: bool,
    pub blocked: bool,
    pub today: bool,
}

/// Accessible phrases used by the calendar's own nodes
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarPhrases {
    pub calendar: String,
    pub prev_month: String,
    pub next_month: String,
    /// `{date}` is replaced by the day
    pub choose_day: String,
    pub selected_day: String,
    pub blocked_day: String,
    /// Grid column headings, Sunday first
    pub weekdays: [String; 7],
}

impl Default for CalendarPhrases {
    fn default() -> Self {
        Self {
            calendar: String::from("Calendar"),
            prev_month: String::from("Move backward to switch to the previous month."),
            next_month: String::from("Move forward to switch to the next month."),
            choose_day: String::from("Choose {date}"),
            selected_day: String::from("Selected. {date}"),
            blocked_day: String::from("Not available. {date}"),
            weekdays: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"].map(String::from),
        }
    }
}

impl CalendarPhrases {
    fn cell_label(&self, date: Date, modifiers: DayModifiers) -> String {
        let template = if modifiers.blocked {
            &self.blocked_day
        } else if modifiers.selected {
            &self.selected_day
        } else {
            &self.choose_day
        };
        template.replace("{date}", &format!("{} {}", date.weekday(), date))
    }
}

/// Callbacks and render overrides supplied by whoever hosts the calendar.
///
/// Every method has a default, so a host only implements what it cares
/// about.
pub trait CalendarHooks {
    /// A day was picked. `None` means the selection was cleared.
    fn on_date_change(&self, date: Option<Date>);

    /// The visible month moved back; `new_month` is its first day
    fn on_prev_month_click(&self, _new_month: Date) {}

    fn on_next_month_click(&self, _new_month: Date) {}

    /// Fired whenever the calendar moves focus onto one of its days
    fn on_focus_change(&self, _focused: bool) {}

    fn is_day_blocked(&self, _date: Date) -> bool {
        false
    }

    /// Style of a day's number
    fn day_style(&self, _date: Date, modifiers: DayModifiers) -> Style {
        default_day_style(modifiers)
    }

    /// Called after each render for every visible day with the node that
    /// holds the day's contents
    fn day_contents_committed(&self, _date: Date, _contents: NodeId, _tree: &NodeTree) {}

    fn render_month_label(&self, month: Date, area: Rect, buf: &mut Buffer) {
        Line::from(format!("{} {}", month.month(), month.year()))
            .centered()
            .render(area, buf);
    }

    fn render_nav_button(
        &self,
        direction: NavDirection,
        _aria_label: &str,
        _focused: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let glyph = match direction {
            NavDirection::Prev => "<",
            NavDirection::Next => ">",
        };
        Line::from(glyph).centered().render(area, buf);
    }
}

pub fn default_day_style(modifiers: DayModifiers) -> Style {
    if modifiers.selected {
        Style::default()
            .fg(Color::Yellow)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else if modifiers.blocked {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if modifiers.today {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    }
}

/// `DateStyler` handed to `Monthly`: asks the host for each day's style and
/// records which days were drawn.
struct HookStyler<'a, H: CalendarHooks> {
    hooks: &'a H,
    selected: Option<Date>,
    cursor: Date,
    cursor_focused: bool,
    today: Option<Date>,
    drawn: &'a RefCell<Vec<(Date, DayModifiers)>>,
}

impl<H: CalendarHooks> HookStyler<'_, H> {
    fn modifiers(&self, date: Date) -> DayModifiers {
        DayModifiers {
            selected: self.selected == Some(date),
            cursor: self.cursor == date,
            focused: self.cursor_focused && self.cursor == date,
            blocked: self.hooks.is_day_blocked(date),
            today: self.today == Some(date),
        }
    }
}

impl<H: CalendarHooks> DateStyler for HookStyler<'_, H> {
    fn get_style(&self, date: Date) -> Style {
        let modifiers = self.modifiers(date);
        self.drawn.borrow_mut().push((date, modifiers));
        self.hooks.day_style(date, modifiers)
    }
}

/// Screen column of weekday `index` (0 is Sunday). Right-to-left grids run
/// Sunday at the right edge.
pub fn weekday_column(index: u16, direction: TextDirection) -> u16 {
    match direction {
        TextDirection::Ltr => index,
        TextDirection::Rtl => 6 - index,
    }
}

fn render_weekday_header(
    names: &[String; 7],
    direction: TextDirection,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.is_empty() {
        return;
    }
    let style = Style::default().fg(Color::Yellow);
    for (index, name) in (0u16..).zip(names.iter()) {
        let x = area.x + weekday_column(index, direction) * CELL_WIDTH;
        if x >= area.right() {
            continue;
        }
        // right-aligned in the cell, like the day numbers below
        let pad = CELL_WIDTH.saturating_sub(name.width() as u16);
        let max_width = (area.right() - x).min(CELL_WIDTH).saturating_sub(pad);
        buf.set_stringn(x + pad, area.y, name, max_width as usize, style);
    }
}

/// Copy `scratch` into `area` with the day columns in reverse order. Each
/// cell keeps its own character order so numbers stay readable.
fn blit_mirrored(scratch: &Buffer, area: Rect, buf: &mut Buffer) {
    for y in 0..scratch.area.height.min(area.height) {
        for x in 0..scratch.area.width {
            let column = weekday_column(x / CELL_WIDTH, TextDirection::Rtl);
            let target = column * CELL_WIDTH + x % CELL_WIDTH;
            if target < area.width {
                buf[(area.x + target, area.y + y)] = scratch[(x, y)].clone();
            }
        }
    }
}

/// Renders one month. Exactly one month is shown; surrounding days are
/// left blank.
pub struct CalendarView<'a, H: CalendarHooks> {
    hooks: &'a H,
    direction: TextDirection,
    selected: Option<Date>,
    today: Option<Date>,
}

impl<'a, H: CalendarHooks> CalendarView<'a, H> {
    pub fn new(hooks: &'a H) -> Self {
        Self {
            hooks,
            direction: TextDirection::Ltr,
            selected: None,
            today: None,
        }
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn selected(mut self, selected: Option<Date>) -> Self {
        self.selected = selected;
        self
    }

    pub fn today(mut self, today: Option<Date>) -> Self {
        self.today = today;
        self
    }
}

impl<H: CalendarHooks> StatefulWidget for CalendarView<'_, H> {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut CalendarState) {
        let layout = CalendarLayout::compute(area, self.direction);
        state.set_layout(layout);

        let focused = state.tree().focused();
        let phrases = state.phrases().clone();
        self.hooks.render_nav_button(
            NavDirection::Prev,
            &phrases.prev_month,
            focused == Some(state.prev_button()),
            layout.prev,
            buf,
        );
        self.hooks.render_nav_button(
            NavDirection::Next,
            &phrases.next_month,
            focused == Some(state.next_button()),
            layout.next,
            buf,
        );
        self.hooks
            .render_month_label(state.visible_month(), layout.label, buf);

        let drawn = RefCell::new(Vec::new());
        let grid = layout.grid;
        let header = Rect { height: grid.height.min(1), ..grid };
        let days = Rect {
            y: grid.y + header.height,
            height: grid.height - header.height,
            ..grid
        };
        render_weekday_header(&phrases.weekdays, self.direction, header, buf);
        if !days.is_empty() {
            let styler = HookStyler {
                hooks: self.hooks,
                selected: self.selected,
                cursor: state.cursor(),
                cursor_focused: state.cursor_has_focus(),
                today: self.today,
                drawn: &drawn,
            };
            let monthly = Monthly::new(state.visible_month(), styler)
                .default_style(Style::default().fg(Color::White));
            match self.direction {
                TextDirection::Ltr => monthly.render(days, buf),
                TextDirection::Rtl => {
                    let mut scratch = Buffer::empty(Rect::new(0, 0, GRID_WIDTH, days.height));
                    monthly.render(scratch.area, &mut scratch);
                    blit_mirrored(&scratch, days, buf);
                }
            }
        }

        state.commit(&drawn.into_inner(), self.hooks);
    }
}
