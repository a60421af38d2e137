/// Date picker: wraps the calendar with the caller's selection, events,
/// callbacks and locale.
///
/// The caller owns the selected value. The picker reads it every frame, shows
/// its month (or `displayed_month` when set), and reports changes back as
/// `YYYY-MM-DDTHH:MM:SS` strings that keep the time of day of the selected
/// value. Whenever the displayed month or year changes the calendar is torn
/// down and mounted afresh.
pub mod day_cell;
pub mod nav;

pub use day_cell::{DayCell, DayLabelEffects};
pub use nav::{MonthLabel, NavButton};

use crate::calendar::{
    CalendarHooks, CalendarPhrases, CalendarState, CalendarView, DayModifiers, NavDirection,
};
use crate::node_tree::{NodeId, NodeSpec, NodeTree, Role};
use calpick_core::dates::{month_preview_timestamp, now_local, selection_timestamp};
use calpick_core::{Dated, Locale};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use ratatui::{
    buffer::Buffer,
    crossterm::event::KeyEvent,
    layout::{Position, Rect},
    style::Style,
    widgets::{StatefulWidget, Widget},
};
use std::cell::{Cell, RefCell};
use std::fmt;
use time::{Date, Month};

pub type DateCallback<'a> = Box<dyn Fn(String) + 'a>;
pub type DatePredicate<'a> = Box<dyn Fn(NaiveDate) -> bool + 'a>;

pub fn to_naive_date(date: Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), u8::from(date.month()) as u32, date.day() as u32)
}

pub fn to_time_date(date: NaiveDate) -> Option<Date> {
    let month = Month::try_from(date.month() as u8).ok()?;
    Date::from_calendar_date(date.year(), month, date.day() as u8).ok()
}

/// Everything the caller hands the picker for one frame
pub struct DatePickerProps<'a, E: Dated> {
    pub selected: Option<NaiveDateTime>,
    /// Month to show instead of the selected one, e.g. one the caller
    /// learnt about through `on_month_preview`
    pub displayed_month: Option<NaiveDate>,
    pub events: &'a [E],
    pub on_change: Option<DateCallback<'a>>,
    /// true means the day cannot be picked
    pub is_invalid_date: Option<DatePredicate<'a>>,
    pub on_month_preview: Option<DateCallback<'a>>,
}

impl<'a, E: Dated> DatePickerProps<'a, E> {
    pub fn new(events: &'a [E]) -> Self {
        Self {
            selected: None,
            displayed_month: None,
            events,
            on_change: None,
            is_invalid_date: None,
            on_month_preview: None,
        }
    }

    pub fn selected(mut self, selected: Option<NaiveDateTime>) -> Self {
        self.selected = selected;
        self
    }

    pub fn displayed_month(mut self, month: Option<NaiveDate>) -> Self {
        self.displayed_month = month;
        self
    }

    /// Day whose month the calendar shows, if the props pin one
    fn view_date(&self) -> Option<NaiveDate> {
        self.displayed_month
            .or_else(|| self.selected.map(|s| s.date()))
    }

    pub fn on_change(mut self, callback: impl Fn(String) + 'a) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn is_invalid_date(mut self, predicate: impl Fn(NaiveDate) -> bool + 'a) -> Self {
        self.is_invalid_date = Some(Box::new(predicate));
        self
    }

    pub fn on_month_preview(mut self, callback: impl Fn(String) + 'a) -> Self {
        self.on_month_preview = Some(Box::new(callback));
        self
    }
}

/// Identity of the mounted calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewKey {
    pub year: i32,
    pub month: u32,
}

impl ViewKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn phrases_for(locale: &Locale) -> CalendarPhrases {
    CalendarPhrases {
        prev_month: locale.prev_month_label().to_string(),
        next_month: locale.next_month_label().to_string(),
        weekdays: locale.weekday_header(),
        ..CalendarPhrases::default()
    }
}

/// Adapter between the calendar's hooks and the caller's props
struct PickerHooks<'p, 'a, E: Dated> {
    props: &'p DatePickerProps<'a, E>,
    locale: &'p Locale,
    labels: &'p RefCell<DayLabelEffects>,
    now: NaiveDateTime,
    interacted: Cell<bool>,
}

impl<'p, 'a, E: Dated> PickerHooks<'p, 'a, E> {
    fn new(
        props: &'p DatePickerProps<'a, E>,
        locale: &'p Locale,
        labels: &'p RefCell<DayLabelEffects>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            props,
            locale,
            labels,
            now,
            interacted: Cell::new(false),
        }
    }

    fn preview(&self, new_month: Date) {
        let Some(month) = to_naive_date(new_month) else {
            return;
        };
        let ts = month_preview_timestamp(month);
        log::debug!("Previewing month {}", ts);
        if let Some(callback) = &self.props.on_month_preview {
            callback(ts);
        }
        self.interacted.set(true);
    }
}

impl<E: Dated> CalendarHooks for PickerHooks<'_, '_, E> {
    fn on_date_change(&self, date: Option<Date>) {
        let Some(day) = date.and_then(to_naive_date) else {
            log::trace!("Ignoring empty date selection");
            return;
        };
        let ts = selection_timestamp(day, self.props.selected, self.now);
        log::debug!("Date selected: {}", ts);
        if let Some(callback) = &self.props.on_change {
            callback(ts);
        }
        self.interacted.set(true);
    }

    fn on_prev_month_click(&self, new_month: Date) {
        self.preview(new_month);
    }

    fn on_next_month_click(&self, new_month: Date) {
        self.preview(new_month);
    }

    // focus moves are handled after render instead
    fn on_focus_change(&self, _focused: bool) {}

    fn is_day_blocked(&self, date: Date) -> bool {
        match (&self.props.is_invalid_date, to_naive_date(date)) {
            (Some(predicate), Some(day)) => predicate(day),
            _ => false,
        }
    }

    fn day_style(&self, date: Date, modifiers: DayModifiers) -> Style {
        match to_naive_date(date) {
            Some(day) => DayCell::for_day(self.props.events, day).style(modifiers),
            None => crate::calendar::default_day_style(modifiers),
        }
    }

    fn day_contents_committed(&self, date: Date, contents: NodeId, tree: &NodeTree) {
        let Some(day) = to_naive_date(date) else {
            return;
        };
        let cell = DayCell::for_day(self.props.events, day);
        self.labels
            .borrow_mut()
            .apply(contents, &cell, self.locale, tree);
    }

    fn render_month_label(&self, month: Date, area: Rect, buf: &mut Buffer) {
        let Some(month) = to_naive_date(month) else {
            return;
        };
        MonthLabel::new(&self.locale.format_month_year(month)).render(area, buf);
    }

    fn render_nav_button(
        &self,
        direction: NavDirection,
        aria_label: &str,
        focused: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        NavButton::new(direction, aria_label)
            .rtl(self.locale.is_rtl())
            .focused(focused)
            .render(area, buf);
    }
}

/// Persistent part of the picker: its node, the keyed calendar view and the
/// pending focus check.
pub struct DatePickerState {
    tree: NodeTree,
    root: NodeId,
    view: Option<(ViewKey, CalendarState)>,
    labels: RefCell<DayLabelEffects>,
    focus_check_pending: bool,
    clock: fn() -> NaiveDateTime,
}

impl DatePickerState {
    pub fn new(tree: NodeTree, parent: Option<NodeId>) -> Self {
        let root = tree.create(parent, NodeSpec::element(Role::Group).label("Date picker"));
        Self {
            tree,
            root,
            view: None,
            labels: RefCell::new(DayLabelEffects::new()),
            focus_check_pending: false,
            clock: now_local,
        }
    }

    /// Replace the wall clock used for "today" and for the time of day of a
    /// first selection
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn view_key(&self) -> Option<ViewKey> {
        self.view.as_ref().map(|(key, _)| *key)
    }

    pub fn calendar(&self) -> Option<&CalendarState> {
        self.view.as_ref().map(|(_, calendar)| calendar)
    }

    pub fn focus_check_pending(&self) -> bool {
        self.focus_check_pending
    }

    /// Make sure the mounted calendar shows the month of `view_date`
    /// (today's month when it is `None`). Returns whether a new calendar was
    /// mounted. The new calendar's cursor stays on the old cursor's day, or
    /// the `selected` day, when either falls in the new month.
    pub fn sync_view(
        &mut self,
        view_date: Option<NaiveDate>,
        selected: Option<NaiveDate>,
        locale: &Locale,
    ) -> bool {
        let displayed = view_date.unwrap_or_else(|| (self.clock)().date());
        let key = ViewKey::of(displayed);
        if self.view_key() == Some(key) {
            return false;
        }
        let old = self.view.take();
        let old_cursor = old
            .as_ref()
            .and_then(|(_, calendar)| to_naive_date(calendar.cursor()));
        let layout = old.as_ref().and_then(|(_, calendar)| calendar.layout());
        if let Some((old_key, _)) = &old {
            log::debug!("Calendar view {} replaced by {}", old_key, key);
        }
        drop(old);

        let initial = [old_cursor, selected]
            .into_iter()
            .flatten()
            .find(|day| ViewKey::of(*day) == key)
            .unwrap_or(displayed);
        let Some(initial) = to_time_date(initial) else {
            log::warn!("Cannot display {} in the calendar", displayed);
            return false;
        };
        let mut calendar = CalendarState::mount(
            self.tree.clone(),
            Some(self.root),
            initial,
            phrases_for(locale),
        );
        if let Some(layout) = layout {
            calendar.set_layout(layout);
        }
        self.view = Some((key, calendar));
        self.labels.borrow_mut().prune(&self.tree);
        true
    }

    fn sync_to_props<E: Dated>(&mut self, props: &DatePickerProps<'_, E>, locale: &Locale) {
        self.sync_view(
            props.view_date(),
            props.selected.map(|s| s.date()),
            locale,
        );
    }

    /// Keyboard input for the calendar. Returns whether the key was used.
    pub fn handle_key_event<E: Dated>(
        &mut self,
        key: KeyEvent,
        props: &DatePickerProps<'_, E>,
        locale: &Locale,
    ) -> bool {
        self.sync_to_props(props, locale);
        let Some((_, calendar)) = self.view.as_mut() else {
            return false;
        };
        let hooks = PickerHooks::new(props, locale, &self.labels, (self.clock)());
        let handled = calendar.handle_key_event(key, locale.direction(), &hooks);
        if hooks.interacted.get() {
            self.focus_check_pending = true;
        }
        handled
    }

    /// Mouse click at `pos`, in terminal coordinates. Returns whether the
    /// click landed on the calendar.
    pub fn handle_mouse_click<E: Dated>(
        &mut self,
        pos: Position,
        props: &DatePickerProps<'_, E>,
        locale: &Locale,
    ) -> bool {
        self.sync_to_props(props, locale);
        let Some((_, calendar)) = self.view.as_mut() else {
            return false;
        };
        let hooks = PickerHooks::new(props, locale, &self.labels, (self.clock)());
        let handled = calendar.handle_click(pos, &hooks);
        if hooks.interacted.get() {
            self.focus_check_pending = true;
        }
        handled
    }

    pub fn contains_focus(&self) -> bool {
        self.tree.has_focus_within(self.root)
    }

    /// Ask for focus to be placed inside the picker after the next render
    pub fn request_focus(&mut self) {
        self.focus_check_pending = true;
    }

    /// Put focus back on the calendar's focus region when it has escaped
    /// the picker. Returns whether focus was moved.
    pub fn retain_focus(&self) -> bool {
        if self.contains_focus() {
            return false;
        }
        let region = self
            .tree
            .find_descendant(self.root, |n| n.role == Role::FocusRegion && n.focusable);
        match region {
            Some(region) if self.tree.focus(region) => {
                log::debug!("Focus restored to the calendar");
                true
            }
            _ => {
                log::trace!("No focus region to restore focus to");
                false
            }
        }
    }

    fn after_render(&mut self) {
        self.labels.borrow_mut().prune(&self.tree);
        if self.focus_check_pending {
            self.focus_check_pending = false;
            self.retain_focus();
        }
    }
}

impl Drop for DatePickerState {
    fn drop(&mut self) {
        self.view = None;
        self.tree.remove(self.root);
    }
}

/// Widget rendering a [`DatePickerState`] for one set of props
pub struct DatePicker<'p, 'a, E: Dated> {
    props: &'p DatePickerProps<'a, E>,
    locale: &'p Locale,
}

impl<'p, 'a, E: Dated> DatePicker<'p, 'a, E> {
    pub fn new(props: &'p DatePickerProps<'a, E>, locale: &'p Locale) -> Self {
        Self { props, locale }
    }
}

impl<E: Dated> StatefulWidget for DatePicker<'_, '_, E> {
    type State = DatePickerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut DatePickerState) {
        state.sync_to_props(self.props, self.locale);
        let now = (state.clock)();
        if let Some((_, calendar)) = state.view.as_mut() {
            let hooks = PickerHooks::new(self.props, self.locale, &state.labels, now);
            CalendarView::new(&hooks)
                .direction(self.locale.direction())
                .selected(self.props.selected.and_then(|s| to_time_date(s.date())))
                .today(to_time_date(now.date()))
                .render(area, buf, calendar);
        }
        state.after_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calpick_core::CalendarEvent;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use std::rc::Rc;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_now() -> NaiveDateTime {
        ts("2024-03-20T09:41:37")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn area() -> Rect {
        Rect::new(0, 0, 21, 8)
    }

    fn new_state() -> DatePickerState {
        DatePickerState::new(NodeTree::new(), None).with_clock(fixed_now)
    }

    fn render<E: Dated>(state: &mut DatePickerState, props: &DatePickerProps<'_, E>, locale: &Locale) -> Buffer {
        let mut buf = Buffer::empty(area());
        DatePicker::new(props, locale).render(area(), &mut buf, state);
        buf
    }

    fn press<E: Dated>(state: &mut DatePickerState, props: &DatePickerProps<'_, E>, code: KeyCode) {
        state.handle_key_event(key(code), props, &Locale::default());
    }

    /// Props with change and preview callbacks that record into the
    /// returned vectors
    fn recording<'a, E: Dated>(
        events: &'a [E],
        changes: &Rc<RefCell<Vec<String>>>,
        previews: &Rc<RefCell<Vec<String>>>,
    ) -> DatePickerProps<'a, E> {
        let changes = changes.clone();
        let previews = previews.clone();
        DatePickerProps::new(events)
            .on_change(move |s| changes.borrow_mut().push(s))
            .on_month_preview(move |s| previews.borrow_mut().push(s))
    }

    fn cell_label(state: &DatePickerState, date: NaiveDate) -> Option<String> {
        let cell = state.calendar()?.cell_node(to_time_date(date)?)?;
        state.tree().label(cell)
    }

    #[test]
    fn test_date_conversions() {
        let d = day(2024, 2, 29);
        assert_eq!(to_naive_date(to_time_date(d).unwrap()), Some(d));
    }

    #[test]
    fn test_selection_keeps_prior_time_of_day() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        for _ in 0..5 {
            press(&mut state, &props, KeyCode::Right);
        }
        press(&mut state, &props, KeyCode::Enter);
        assert_eq!(*changes.borrow(), vec!["2024-03-15T14:22:00"]);
        assert!(previews.borrow().is_empty());
    }

    #[test]
    fn test_first_selection_uses_current_time() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews);
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        assert_eq!(state.view_key(), Some(ViewKey { year: 2024, month: 3 }));
        press(&mut state, &props, KeyCode::Enter);
        assert_eq!(*changes.borrow(), vec!["2024-03-20T09:41:00"]);
    }

    #[test]
    fn test_empty_selection_is_ignored() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        press(&mut state, &props, KeyCode::Delete);
        assert!(changes.borrow().is_empty());
        assert!(!state.focus_check_pending());
    }

    #[test]
    fn test_navigation_previews_without_changing() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        press(&mut state, &props, KeyCode::PageDown);
        assert_eq!(*previews.borrow(), vec!["2024-04-01T00:00:00"]);
        assert!(changes.borrow().is_empty());
        assert!(state.focus_check_pending());

        press(&mut state, &props, KeyCode::PageUp);
        press(&mut state, &props, KeyCode::PageUp);
        assert_eq!(
            *previews.borrow(),
            vec!["2024-04-01T00:00:00", "2024-03-01T00:00:00", "2024-02-01T00:00:00"]
        );
    }

    #[test]
    fn test_invalid_date_cannot_be_chosen() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-15T08:00:00")))
            .is_invalid_date(|d| d == NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        press(&mut state, &props, KeyCode::Enter);
        assert!(changes.borrow().is_empty());
        assert_eq!(
            cell_label(&state, day(2024, 3, 15)).as_deref(),
            Some("Friday, March 15, 2024")
        );
    }

    #[test]
    fn test_day_labels_describe_events() {
        let events = vec![
            CalendarEvent::new(ts("2024-03-11T10:00:00"), "standup"),
            CalendarEvent::new(ts("2024-03-12T10:00:00"), "review"),
            CalendarEvent::new(ts("2024-03-12T16:30:00"), "retro"),
            CalendarEvent::new(ts("2024-03-12T18:00:00"), "drinks"),
        ];
        let props = DatePickerProps::new(&events).selected(Some(ts("2024-03-01T00:00:00")));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        assert_eq!(
            cell_label(&state, day(2024, 3, 11)).as_deref(),
            Some("Monday, March 11, 2024 There is 1 event.")
        );
        assert_eq!(
            cell_label(&state, day(2024, 3, 12)).as_deref(),
            Some("Tuesday, March 12, 2024 There are 3 events.")
        );
        assert_eq!(
            cell_label(&state, day(2024, 3, 15)).as_deref(),
            Some("Friday, March 15, 2024")
        );
    }

    #[test]
    fn test_labels_follow_event_changes() {
        let mut events = vec![CalendarEvent::new(ts("2024-03-11T10:00:00"), "standup")];
        let mut state = new_state();
        {
            let props = DatePickerProps::new(&events).selected(Some(ts("2024-03-01T00:00:00")));
            render(&mut state, &props, &Locale::default());
        }
        events.push(CalendarEvent::new(ts("2024-03-11T17:00:00"), "deploy"));
        let props = DatePickerProps::new(&events).selected(Some(ts("2024-03-01T00:00:00")));
        render(&mut state, &props, &Locale::default());
        assert_eq!(
            cell_label(&state, day(2024, 3, 11)).as_deref(),
            Some("Monday, March 11, 2024 There are 2 events.")
        );
    }

    #[test]
    fn test_localised_labels() {
        let events = vec![
            CalendarEvent::new(ts("2024-03-11T10:00:00"), "a"),
            CalendarEvent::new(ts("2024-03-11T11:00:00"), "b"),
        ];
        let props = DatePickerProps::new(&events).selected(Some(ts("2024-03-01T00:00:00")));
        let mut state = new_state();
        let de = Locale::resolve("de");
        let buf = render(&mut state, &props, &de);
        assert_eq!(
            cell_label(&state, day(2024, 3, 11)).as_deref(),
            Some("Montag, 11. März 2024 Es gibt 2 Termine.")
        );
        let header: String = (0..21).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(header.contains("März 2024"));
        let weekdays: String = (0..21).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(weekdays, " So Mo Di Mi Do Fr Sa");
    }

    #[test]
    fn test_view_remounts_when_month_changes() {
        let mut state = new_state();
        let locale = Locale::default();
        let march = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-10T14:22:00")));
        render(&mut state, &march, &locale);
        let first_root = state.calendar().unwrap().root();

        let same_month = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-28T14:22:00")));
        render(&mut state, &same_month, &locale);
        assert_eq!(state.calendar().unwrap().root(), first_root);

        let next_year = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2025-03-01T00:00:00")));
        render(&mut state, &next_year, &locale);
        assert_ne!(state.calendar().unwrap().root(), first_root);
        assert!(!state.tree().exists(first_root));
        assert_eq!(state.view_key(), Some(ViewKey { year: 2025, month: 3 }));
        assert_eq!(state.view_key().unwrap().to_string(), "2025-03");
    }

    #[test]
    fn test_focus_restored_after_navigation() {
        let props = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        let locale = Locale::default();
        render(&mut state, &props, &locale);
        press(&mut state, &props, KeyCode::Right);
        assert!(state.calendar().unwrap().cursor_has_focus());

        // the focused cell is unmounted with the old month
        press(&mut state, &props, KeyCode::PageDown);
        assert!(!state.contains_focus());

        render(&mut state, &props, &locale);
        let region = state.calendar().unwrap().focus_region();
        assert_eq!(state.tree().focused(), Some(region));
        assert!(!state.focus_check_pending());
    }

    #[test]
    fn test_focus_restored_after_remount() {
        let mut state = new_state();
        let locale = Locale::default();
        let previews = Rc::new(RefCell::new(Vec::new()));
        let recorder = previews.clone();
        let props = DatePickerProps::<CalendarEvent>::new(&[])
            .selected(Some(ts("2024-03-10T14:22:00")))
            .on_month_preview(move |s| recorder.borrow_mut().push(s));
        render(&mut state, &props, &locale);
        press(&mut state, &props, KeyCode::Right);
        press(&mut state, &props, KeyCode::PageDown);

        // caller feeds the previewed month back as the displayed month
        let preview = previews.borrow()[0].clone();
        let props = DatePickerProps::<CalendarEvent>::new(&[])
            .selected(Some(ts("2024-03-10T14:22:00")))
            .displayed_month(Some(ts(&preview).date()));
        render(&mut state, &props, &locale);
        assert_eq!(state.view_key(), Some(ViewKey { year: 2024, month: 4 }));
        assert!(state.contains_focus());
        // cursor kept its day across the remount
        assert_eq!(state.calendar().unwrap().cursor(), to_time_date(day(2024, 4, 11)).unwrap());
    }

    #[test]
    fn test_selection_in_displayed_month_keeps_time_of_day() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-10T14:22:00")))
            .displayed_month(Some(day(2024, 4, 1)));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        assert_eq!(state.view_key(), Some(ViewKey { year: 2024, month: 4 }));
        press(&mut state, &props, KeyCode::Enter);
        assert_eq!(*changes.borrow(), vec!["2024-04-01T14:22:00"]);
    }

    #[test]
    fn test_click_before_render_uses_current_props() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let locale = Locale::default();
        let mut state = new_state();
        let march = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-10T14:22:00")));
        render(&mut state, &march, &locale);

        let april = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-04-20T08:15:00")));
        // Sunday column, second week row of April
        assert!(state.handle_mouse_click(Position::new(1, 3), &april, &locale));
        assert_eq!(state.view_key(), Some(ViewKey { year: 2024, month: 4 }));
        assert_eq!(*changes.borrow(), vec!["2024-04-07T08:15:00"]);
    }

    #[test]
    fn test_focus_left_alone_when_inside() {
        let props = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        let locale = Locale::default();
        render(&mut state, &props, &locale);
        press(&mut state, &props, KeyCode::Tab);
        let prev = state.calendar().unwrap().prev_button();
        assert_eq!(state.tree().focused(), Some(prev));
        assert!(!state.retain_focus());
        assert_eq!(state.tree().focused(), Some(prev));
    }

    #[test]
    fn test_request_focus_lands_in_picker() {
        let props = DatePickerProps::<CalendarEvent>::new(&[]);
        let mut state = new_state();
        state.request_focus();
        render(&mut state, &props, &Locale::default());
        assert!(state.contains_focus());
    }

    #[test]
    fn test_click_selects_day() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let previews = Rc::new(RefCell::new(Vec::new()));
        let props = recording::<CalendarEvent>(&[], &changes, &previews)
            .selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        render(&mut state, &props, &Locale::default());
        // Sunday column, second week row
        assert!(state.handle_mouse_click(Position::new(1, 3), &props, &Locale::default()));
        assert_eq!(*changes.borrow(), vec!["2024-03-03T14:22:00"]);
        assert!(!state.handle_mouse_click(Position::new(40, 40), &props, &Locale::default()));
    }

    #[test]
    fn test_rtl_header_is_mirrored() {
        let props = DatePickerProps::<CalendarEvent>::new(&[]).selected(Some(ts("2024-03-10T14:22:00")));
        let mut state = new_state();
        let ar = Locale::resolve("ar");
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 8));
        DatePicker::new(&props, &ar).render(buf.area, &mut buf, &mut state);
        let header: String = (0..30).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        // grid is right-aligned: next button first, previous button last
        assert!(header.starts_with("         [‹]"));
        assert!(header.ends_with("[›]"));
    }

    #[test]
    fn test_drop_unmounts_everything() {
        let tree = NodeTree::new();
        let mut state = DatePickerState::new(tree.clone(), None).with_clock(fixed_now);
        let props = DatePickerProps::<CalendarEvent>::new(&[]);
        render(&mut state, &props, &Locale::default());
        assert!(!tree.is_empty());
        drop(state);
        assert!(tree.is_empty());
    }
}
