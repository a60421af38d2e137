/// Screen chrome around the picker: which panel has the keyboard, the help
/// overlay, the status-line error and the exit flag
use crate::actions::{Action, PanelId};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct UIState {
    pub focused_panel: PanelId,
    pub show_help: bool,
    /// Shown in the header until cleared or replaced
    pub error_message: Option<String>,
    pub should_exit: bool,
}

impl UIState {
    fn apply(&mut self, action: &Action) {
        match action {
            Action::FocusPanel(panel) => self.focused_panel = *panel,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ShowError(message) | Action::EventsLoadFailed(message) => {
                self.error_message = Some(message.clone())
            }
            // a successful reload supersedes an earlier failure
            Action::ClearError | Action::EventsLoaded(_) => self.error_message = None,
            Action::Quit => self.should_exit = true,
            _ => {}
        }
    }
}

#[derive(Clone, Default)]
pub struct UIStore {
    state: Arc<RwLock<UIState>>,
}

impl UIStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_state(&self) -> UIState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reduce(&self, action: &Action) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
    }

    pub fn should_exit(&self) -> bool {
        self.get_state().should_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_agenda() {
        let state = UIStore::new().get_state();
        assert_eq!(state.focused_panel, PanelId::Agenda);
        assert!(!state.show_help);
        assert!(!state.should_exit);
    }

    #[test]
    fn test_panel_focus_and_help() {
        let store = UIStore::new();
        store.reduce(&Action::FocusPanel(PanelId::Logs));
        store.reduce(&Action::ToggleHelp);
        let state = store.get_state();
        assert_eq!(state.focused_panel, PanelId::Logs);
        assert!(state.show_help);
        store.reduce(&Action::ToggleHelp);
        assert!(!store.get_state().show_help);
    }

    #[test]
    fn test_load_failure_shows_error_until_cleared() {
        let store = UIStore::new();
        store.reduce(&Action::EventsLoadFailed(String::from("IoError: missing")));
        assert_eq!(
            store.get_state().error_message.as_deref(),
            Some("IoError: missing")
        );
        store.reduce(&Action::ClearError);
        assert_eq!(store.get_state().error_message, None);
    }

    #[test]
    fn test_loaded_events_clear_stale_error() {
        let store = UIStore::new();
        store.reduce(&Action::ShowError(String::from("boom")));
        store.reduce(&Action::EventsLoaded(Vec::new()));
        assert_eq!(store.get_state().error_message, None);
    }

    #[test]
    fn test_quit() {
        let store = UIStore::new();
        assert!(!store.should_exit());
        store.reduce(&Action::Quit);
        assert!(store.should_exit());
    }
}
