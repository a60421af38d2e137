/// Lines captured by the in-memory logger, and how far the log panel is
/// scrolled back from the newest one
use crate::actions::Action;
use crate::logger::LogBuffer;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct AppLogsState {
    pub logs: Vec<String>,
    /// 0 shows the newest line at the bottom
    pub scroll_offset: usize,
}

impl AppLogsState {
    /// Positive `delta` scrolls towards older lines
    fn scroll(&mut self, delta: i32) {
        let lines = delta.unsigned_abs() as usize;
        self.scroll_offset = if delta > 0 {
            self.scroll_offset
                .saturating_add(lines)
                .min(self.logs.len().saturating_sub(1))
        } else {
            self.scroll_offset.saturating_sub(lines)
        };
    }
}

pub struct AppLogsStore {
    state: Arc<RwLock<AppLogsState>>,
    log_buffer: LogBuffer,
}

impl AppLogsStore {
    pub fn new(log_buffer: LogBuffer) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppLogsState::default())),
            log_buffer,
        }
    }

    pub fn get_state(&self) -> AppLogsState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every action pulls in lines logged since the last one
    pub fn dispatch(&self, action: &Action) {
        let logs = self.log_buffer.get_logs();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.logs = logs;
        if let Action::ScrollLogs(delta) = action {
            state.scroll(*delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogEntry;

    fn buffer_with(lines: usize) -> LogBuffer {
        let buffer = LogBuffer::with_capacity(100);
        for i in 0..lines {
            buffer.add_log(LogEntry {
                timestamp: String::from("2024-03-10 14:22:00.000"),
                level: String::from("DEBUG"),
                target: String::from("calpick_tui"),
                message: format!("line {}", i),
            });
        }
        buffer
    }

    #[test]
    fn test_any_action_refreshes_logs() {
        let store = AppLogsStore::new(buffer_with(3));
        assert!(store.get_state().logs.is_empty());
        store.dispatch(&Action::ToggleHelp);
        assert_eq!(store.get_state().logs.len(), 3);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let store = AppLogsStore::new(buffer_with(5));
        store.dispatch(&Action::ScrollLogs(3));
        assert_eq!(store.get_state().scroll_offset, 3);
        store.dispatch(&Action::ScrollLogs(10));
        assert_eq!(store.get_state().scroll_offset, 4);
        store.dispatch(&Action::ScrollLogs(-10));
        assert_eq!(store.get_state().scroll_offset, 0);
    }
}
