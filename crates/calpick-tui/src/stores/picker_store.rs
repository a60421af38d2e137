/// PickerStore holds the date picker's value, the loaded events and whether
/// the popover is open
use crate::actions::Action;
use calpick_core::dates::{format_timestamp, parse_timestamp};
use calpick_core::{CalendarEvent, events_on_day};
use chrono::NaiveDateTime;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    /// Last day the user picked
    pub selected: Option<NaiveDateTime>,

    /// Value handed to the picker: the selection, or the month being
    /// previewed since
    pub displayed: Option<NaiveDateTime>,

    pub events: Vec<CalendarEvent>,

    pub is_open: bool,

    pub is_loading: bool,
}

impl PickerState {
    /// Events on the selected day, in file order
    pub fn agenda(&self) -> Vec<&CalendarEvent> {
        match self.selected {
            Some(selected) => events_on_day(&self.events, selected.date()),
            None => Vec::new(),
        }
    }

    pub fn selection_string(&self) -> Option<String> {
        self.selected.as_ref().map(format_timestamp)
    }
}

/// Store that holds picker state
#[derive(Clone)]
pub struct PickerStore {
    state: Arc<RwLock<PickerState>>,
}

impl PickerStore {
    pub fn new(selected: Option<NaiveDateTime>) -> Self {
        Self {
            state: Arc::new(RwLock::new(PickerState {
                selected,
                displayed: selected,
                ..PickerState::default()
            })),
        }
    }

    /// Get a read-only snapshot of the current state
    pub fn get_state(&self) -> PickerState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reducer: handle an action and update state accordingly
    pub fn reduce(&self, action: &Action) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        match action {
            Action::OpenPicker => {
                state.is_open = true;
            }
            Action::ClosePicker => {
                state.is_open = false;
                // reopening starts from the selection again
                state.displayed = state.selected;
            }
            Action::DateChanged(ts) => match parse_timestamp(ts) {
                Ok(dt) => {
                    state.selected = Some(dt);
                    state.displayed = Some(dt);
                }
                Err(e) => log::warn!("Ignoring picker value '{}': {}", ts, e),
            },
            Action::MonthPreviewed(ts) => match parse_timestamp(ts) {
                Ok(dt) => state.displayed = Some(dt),
                Err(e) => log::warn!("Ignoring month preview '{}': {}", ts, e),
            },
            Action::LoadEvents(_) => {
                state.is_loading = true;
            }
            Action::EventsLoaded(events) => {
                state.events = events.clone();
                state.is_loading = false;
            }
            Action::EventsLoadFailed(_) => {
                state.is_loading = false;
            }
            _ => {}
        }
    }
}
