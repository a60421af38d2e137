/// Keyboard and mouse input handling
use crate::actions::{Action, PanelId};
use crate::stores::{PickerStore, UIStore};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::layout::Position;

const PAGE: i32 = 10;

/// Handle keyboard input and return the appropriate Action
pub fn handle_key_event(
    key_event: KeyEvent,
    ui_store: &UIStore,
    picker_store: &PickerStore,
) -> Option<Action> {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    // while the popover is open every other key belongs to the picker
    if picker_store.get_state().is_open {
        return match key_event.code {
            KeyCode::Esc => Some(Action::ClosePicker),
            _ => Some(Action::PickerKey(key_event)),
        };
    }

    let ui_state = ui_store.get_state();
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Esc if ui_state.show_help => Some(Action::ToggleHelp),
        KeyCode::Char('o') | KeyCode::Enter => Some(Action::OpenPicker),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::FocusPanel(other_panel(ui_state.focused_panel))),
        _ if ui_state.focused_panel == PanelId::Logs => handle_log_keys(key_event),
        _ => None,
    }
}

fn handle_log_keys(key_event: KeyEvent) -> Option<Action> {
    match key_event.code {
        KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollLogs(1)),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollLogs(-1)),
        KeyCode::PageUp => Some(Action::ScrollLogs(PAGE)),
        KeyCode::PageDown => Some(Action::ScrollLogs(-PAGE)),
        _ => None,
    }
}

fn other_panel(panel: PanelId) -> PanelId {
    match panel {
        PanelId::Agenda => PanelId::Logs,
        PanelId::Logs => PanelId::Agenda,
    }
}

/// Handle a left click. Only the open picker reacts to the mouse.
pub fn handle_mouse_event(mouse_event: MouseEvent, picker_store: &PickerStore) -> Option<Action> {
    if picker_store.get_state().is_open {
        Some(Action::PickerClick(Position::new(
            mouse_event.column,
            mouse_event.row,
        )))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{MouseButton, MouseEventKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_global_keys() {
        let ui = UIStore::new();
        let picker = PickerStore::new(None);
        assert!(matches!(handle_key_event(key(KeyCode::Char('q')), &ui, &picker), Some(Action::Quit)));
        assert!(matches!(handle_key_event(key(KeyCode::Char('?')), &ui, &picker), Some(Action::ToggleHelp)));
        assert!(matches!(handle_key_event(key(KeyCode::Enter), &ui, &picker), Some(Action::OpenPicker)));
        assert!(matches!(
            handle_key_event(key(KeyCode::Tab), &ui, &picker),
            Some(Action::FocusPanel(PanelId::Logs))
        ));
    }

    #[test]
    fn test_open_picker_takes_keys() {
        let ui = UIStore::new();
        let picker = PickerStore::new(None);
        picker.reduce(&Action::OpenPicker);
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q')), &ui, &picker),
            Some(Action::PickerKey(_))
        ));
        assert!(matches!(handle_key_event(key(KeyCode::Esc), &ui, &picker), Some(Action::ClosePicker)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handle_key_event(ctrl_c, &ui, &picker), Some(Action::Quit)));
    }

    #[test]
    fn test_log_scrolling_needs_focus() {
        let ui = UIStore::new();
        let picker = PickerStore::new(None);
        assert!(handle_key_event(key(KeyCode::Up), &ui, &picker).is_none());
        ui.reduce(&Action::FocusPanel(PanelId::Logs));
        assert!(matches!(handle_key_event(key(KeyCode::Up), &ui, &picker), Some(Action::ScrollLogs(1))));
        assert!(matches!(
            handle_key_event(key(KeyCode::PageDown), &ui, &picker),
            Some(Action::ScrollLogs(-10))
        ));
    }

    #[test]
    fn test_mouse_only_when_open() {
        let picker = PickerStore::new(None);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert!(handle_mouse_event(click, &picker).is_none());
        picker.reduce(&Action::OpenPicker);
        match handle_mouse_event(click, &picker) {
            Some(Action::PickerClick(pos)) => assert_eq!(pos, Position::new(4, 7)),
            other => panic!("unexpected action {:?}", other),
        }
    }
}
