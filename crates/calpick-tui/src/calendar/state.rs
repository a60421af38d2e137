use super::{
    CALENDAR_HEIGHT, CELL_WIDTH, CalendarHooks, CalendarPhrases, DayModifiers, GRID_WIDTH,
    NAV_WIDTH, NavDirection, weekday_column,
};
use crate::node_tree::{NodeId, NodeSpec, NodeTree, Role};
use calpick_core::TextDirection;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use std::collections::BTreeMap;
use time::{Date, Duration, Month};

/// Where the calendar drew its parts during the last render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarLayout {
    pub prev: Rect,
    pub next: Rect,
    pub label: Rect,
    /// Weekday header plus the weeks
    pub grid: Rect,
    /// Right-to-left grids put Sunday in the rightmost column
    pub direction: TextDirection,
}

impl CalendarLayout {
    pub fn compute(area: Rect, direction: TextDirection) -> Self {
        let width = GRID_WIDTH.min(area.width);
        let x = match direction {
            TextDirection::Ltr => area.x,
            TextDirection::Rtl => area.x + area.width.saturating_sub(width),
        };
        let header_height = area.height.min(1);
        let nav_width = NAV_WIDTH.min(width);
        let start = Rect::new(x, area.y, nav_width, header_height);
        let end = Rect::new(
            x + width.saturating_sub(nav_width),
            area.y,
            nav_width,
            header_height,
        );
        let label = Rect::new(
            x + nav_width,
            area.y,
            width.saturating_sub(2 * nav_width),
            header_height,
        );
        let grid = Rect::new(
            x,
            area.y + header_height,
            width,
            area.height
                .saturating_sub(header_height)
                .min(CALENDAR_HEIGHT - 1),
        );
        let (prev, next) = match direction {
            TextDirection::Ltr => (start, end),
            TextDirection::Rtl => (end, start),
        };
        Self {
            prev,
            next,
            label,
            grid,
            direction,
        }
    }
}

#[derive(Debug, Clone)]
struct DayNodes {
    cell: NodeId,
    contents: NodeId,
    /// label last written by the calendar itself
    own_label: String,
}

/// Internal state of a mounted calendar: visible month, cursor and the
/// nodes it owns. Dropping the state unmounts the nodes.
pub struct CalendarState {
    tree: NodeTree,
    phrases: CalendarPhrases,
    root: NodeId,
    prev_button: NodeId,
    next_button: NodeId,
    focus_region: NodeId,
    grid: NodeId,
    cells: BTreeMap<Date, DayNodes>,
    /// always the first of a month
    visible_month: Date,
    cursor: Date,
    layout: Option<CalendarLayout>,
}

impl CalendarState {
    /// Mount a calendar under `parent`, opened on the month of `initial`
    pub fn mount(
        tree: NodeTree,
        parent: Option<NodeId>,
        initial: Date,
        phrases: CalendarPhrases,
    ) -> Self {
        let root = tree.create(
            parent,
            NodeSpec::element(Role::Application).label(phrases.calendar.clone()),
        );
        let prev_button = tree.create(
            Some(root),
            NodeSpec::element(Role::Button)
                .label(phrases.prev_month.clone())
                .focusable(),
        );
        tree.create(Some(root), NodeSpec::element(Role::Heading));
        let next_button = tree.create(
            Some(root),
            NodeSpec::element(Role::Button)
                .label(phrases.next_month.clone())
                .focusable(),
        );
        let focus_region = tree.create(
            Some(root),
            NodeSpec::element(Role::FocusRegion).focusable(),
        );
        let grid = tree.create(Some(focus_region), NodeSpec::element(Role::Grid));

        let mut state = Self {
            tree,
            phrases,
            root,
            prev_button,
            next_button,
            focus_region,
            grid,
            cells: BTreeMap::new(),
            visible_month: initial.replace_day(1).unwrap_or(initial),
            cursor: initial,
            layout: None,
        };
        state.mount_cells();
        state
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn phrases(&self) -> &CalendarPhrases {
        &self.phrases
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn prev_button(&self) -> NodeId {
        self.prev_button
    }

    pub fn next_button(&self) -> NodeId {
        self.next_button
    }

    pub fn focus_region(&self) -> NodeId {
        self.focus_region
    }

    pub fn visible_month(&self) -> Date {
        self.visible_month
    }

    pub fn cursor(&self) -> Date {
        self.cursor
    }

    pub fn layout(&self) -> Option<CalendarLayout> {
        self.layout
    }

    /// Geometry used for hit-testing until the next render
    pub fn set_layout(&mut self, layout: CalendarLayout) {
        self.layout = Some(layout);
    }

    pub fn cell_node(&self, date: Date) -> Option<NodeId> {
        self.cells.get(&date).map(|d| d.cell)
    }

    pub fn contents_node(&self, date: Date) -> Option<NodeId> {
        self.cells.get(&date).map(|d| d.contents)
    }

    pub fn cursor_has_focus(&self) -> bool {
        match (self.tree.focused(), self.cell_node(self.cursor)) {
            (Some(focused), Some(cell)) => focused == cell,
            _ => false,
        }
    }

    /// Replace the cell nodes with fresh ones for the visible month. Focus
    /// on an old cell is lost.
    fn mount_cells(&mut self) {
        for (_, nodes) in std::mem::take(&mut self.cells) {
            self.tree.remove(nodes.cell);
        }
        let month = self.visible_month.month();
        let year = self.visible_month.year();
        for day in 1..=month.length(year) {
            let Ok(date) = Date::from_calendar_date(year, month, day) else {
                continue;
            };
            let own_label = self
                .phrases
                .cell_label(date, DayModifiers::default());
            let cell = self.tree.create(
                Some(self.grid),
                NodeSpec::element(Role::GridCell)
                    .label(own_label.clone())
                    .focusable(),
            );
            let contents = self.tree.create(Some(cell), NodeSpec::element(Role::Group));
            self.cells.insert(
                date,
                DayNodes {
                    cell,
                    contents,
                    own_label,
                },
            );
        }
    }

    /// Post-render bookkeeping: refresh the calendar's own cell labels
    /// where they changed, then let the host see every drawn day.
    pub(super) fn commit<H: CalendarHooks>(&mut self, drawn: &[(Date, DayModifiers)], hooks: &H) {
        for (date, modifiers) in drawn {
            let Some(nodes) = self.cells.get_mut(date) else {
                continue;
            };
            let label = self.phrases.cell_label(*date, *modifiers);
            if label != nodes.own_label {
                self.tree.set_label(nodes.cell, label.clone());
                nodes.own_label = label;
            }
        }
        for (date, _) in drawn {
            if let Some(contents) = self.contents_node(*date) {
                hooks.day_contents_committed(*date, contents, &self.tree);
            }
        }
    }

    /// Show the previous or next month and tell the host about it
    pub fn navigate<H: CalendarHooks>(&mut self, direction: NavDirection, hooks: &H) {
        let Some(new_month) = adjacent_month(self.visible_month, direction) else {
            return;
        };
        log::trace!("Calendar moving to {}", new_month);
        let day = self
            .cursor
            .day()
            .min(new_month.month().length(new_month.year()));
        self.visible_month = new_month;
        self.cursor = new_month.replace_day(day).unwrap_or(new_month);
        self.mount_cells();
        match direction {
            NavDirection::Prev => hooks.on_prev_month_click(new_month),
            NavDirection::Next => hooks.on_next_month_click(new_month),
        }
    }

    fn select<H: CalendarHooks>(&self, date: Date, hooks: &H) {
        if hooks.is_day_blocked(date) {
            log::trace!("Ignoring selection of blocked day {}", date);
            return;
        }
        hooks.on_date_change(Some(date));
    }

    fn focus_cursor<H: CalendarHooks>(&self, hooks: &H) {
        if let Some(cell) = self.cell_node(self.cursor) {
            if self.tree.focus(cell) {
                hooks.on_focus_change(true);
            }
        }
    }

    /// Move the cursor by `days`, switching month when it leaves the
    /// visible one. The cursor cell takes focus.
    fn move_cursor<H: CalendarHooks>(&mut self, days: i64, hooks: &H) {
        let Some(target) = self.cursor.checked_add(Duration::days(days)) else {
            return;
        };
        if (target.year(), target.month()) != (self.visible_month.year(), self.visible_month.month()) {
            let direction = if target < self.visible_month {
                NavDirection::Prev
            } else {
                NavDirection::Next
            };
            self.navigate(direction, hooks);
        }
        self.cursor = target;
        self.focus_cursor(hooks);
    }

    fn cycle_focus<H: CalendarHooks>(&self, forward: bool, hooks: &H) {
        let cursor_cell = self.cell_node(self.cursor).unwrap_or(self.focus_region);
        let order = [self.prev_button, self.next_button, cursor_cell];
        let focused = self.tree.focused();
        let current = order
            .iter()
            .position(|id| Some(*id) == focused)
            .or_else(|| (focused == Some(self.focus_region)).then_some(2));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
            (None, _) => 0,
        };
        if self.tree.focus(order[next]) && order[next] == cursor_cell {
            hooks.on_focus_change(true);
        }
    }

    /// Keyboard handling. Returns whether the key was used.
    pub fn handle_key_event<H: CalendarHooks>(
        &mut self,
        key: KeyEvent,
        direction: TextDirection,
        hooks: &H,
    ) -> bool {
        let focused = self.tree.focused();
        let on_prev = focused == Some(self.prev_button);
        let on_next = focused == Some(self.next_button);
        let step = match direction {
            TextDirection::Ltr => 1,
            TextDirection::Rtl => -1,
        };
        match key.code {
            KeyCode::Tab => self.cycle_focus(true, hooks),
            KeyCode::BackTab => self.cycle_focus(false, hooks),
            KeyCode::Enter | KeyCode::Char(' ') if on_prev => {
                self.navigate(NavDirection::Prev, hooks)
            }
            KeyCode::Enter | KeyCode::Char(' ') if on_next => {
                self.navigate(NavDirection::Next, hooks)
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.cursor, hooks),
            KeyCode::Left => self.move_cursor(-step, hooks),
            KeyCode::Right => self.move_cursor(step, hooks),
            KeyCode::Up => self.move_cursor(-7, hooks),
            KeyCode::Down => self.move_cursor(7, hooks),
            KeyCode::Home => {
                let back = self.cursor.weekday().number_days_from_sunday() as i64;
                self.move_cursor(-back, hooks)
            }
            KeyCode::End => {
                let forward = 6 - self.cursor.weekday().number_days_from_sunday() as i64;
                self.move_cursor(forward, hooks)
            }
            KeyCode::PageUp => self.navigate(NavDirection::Prev, hooks),
            KeyCode::PageDown => self.navigate(NavDirection::Next, hooks),
            KeyCode::Delete | KeyCode::Backspace => hooks.on_date_change(None),
            _ => return false,
        }
        true
    }

    /// Day drawn at `pos` during the last render, if any
    pub fn day_at(&self, pos: Position) -> Option<Date> {
        let grid = self.layout?.grid;
        // first row of the grid is the weekday header
        let days = Rect::new(grid.x, grid.y + 1, grid.width, grid.height.saturating_sub(1));
        if !days.contains(pos) {
            return None;
        }
        let row = pos.y - days.y;
        let column = (pos.x - days.x) / CELL_WIDTH;
        if column > 6 {
            return None;
        }
        // the mapping is its own inverse
        let col = weekday_column(column, self.layout?.direction);
        let lead = self.visible_month.weekday().number_days_from_sunday() as i64;
        let offset = (row as i64) * 7 + col as i64 - lead;
        let date = self.visible_month.checked_add(Duration::days(offset))?;
        (date.month() == self.visible_month.month() && date.year() == self.visible_month.year())
            .then_some(date)
    }

    /// Mouse click handling. Returns whether the click hit the calendar.
    pub fn handle_click<H: CalendarHooks>(&mut self, pos: Position, hooks: &H) -> bool {
        let Some(layout) = self.layout else {
            return false;
        };
        if layout.prev.contains(pos) {
            self.tree.focus(self.prev_button);
            self.navigate(NavDirection::Prev, hooks);
            return true;
        }
        if layout.next.contains(pos) {
            self.tree.focus(self.next_button);
            self.navigate(NavDirection::Next, hooks);
            return true;
        }
        match self.day_at(pos) {
            Some(date) => {
                self.cursor = date;
                self.focus_cursor(hooks);
                self.select(date, hooks);
                true
            }
            None => false,
        }
    }
}

impl Drop for CalendarState {
    fn drop(&mut self) {
        self.tree.remove(self.root);
    }
}

fn adjacent_month(month_start: Date, direction: NavDirection) -> Option<Date> {
    let (year, month) = match (direction, month_start.month()) {
        (NavDirection::Prev, Month::January) => (month_start.year() - 1, Month::December),
        (NavDirection::Prev, m) => (month_start.year(), m.previous()),
        (NavDirection::Next, Month::December) => (month_start.year() + 1, Month::January),
        (NavDirection::Next, m) => (month_start.year(), m.next()),
    };
    Date::from_calendar_date(year, month, 1).ok()
}
