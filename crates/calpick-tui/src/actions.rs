/// Core Action types for the flux architecture.
/// All state mutations flow through Actions dispatched to the Dispatcher.
use calpick_core::CalendarEvent;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Position;
use std::path::PathBuf;

/// Represents all possible user intents and system events in the application
#[derive(Debug, Clone)]
pub enum Action {
    // ===== UI Actions (user-initiated) =====
    /// User opened the date picker popover
    OpenPicker,

    /// Picker popover closed, either explicitly or because focus left it
    ClosePicker,

    /// Key press routed to the open picker
    PickerKey(KeyEvent),

    /// Left click routed to the open picker
    PickerClick(Position),

    /// User changed focus to a different panel
    FocusPanel(PanelId),

    /// Scroll the log panel by the given number of lines (positive is older)
    ScrollLogs(i32),

    /// User toggled the help overlay
    ToggleHelp,

    // ===== Picker callbacks =====
    /// A day was picked, as a `YYYY-MM-DDTHH:MM:SS` timestamp
    DateChanged(String),

    /// The picker moved to another month; timestamp of its first day
    MonthPreviewed(String),

    // ===== System/Effect Actions (emitted by Effects) =====
    /// Read events from a YAML file
    LoadEvents(PathBuf),

    /// Events file was read successfully
    EventsLoaded(Vec<CalendarEvent>),

    /// Failed to read the events file
    EventsLoadFailed(String),

    /// Generic error to display to user
    ShowError(String),

    /// Clear any displayed errors
    ClearError,

    /// Application should exit
    Quit,
}

/// Identifies different panels in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelId {
    #[default]
    Agenda,
    Logs,
}
