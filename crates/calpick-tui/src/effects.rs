/// Effects module handles side effects (file I/O, timers)
/// Effects are triggered by Actions and dispatch new Actions with results
use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use calpick_core::events::load_events;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task;

/// How long an error stays on screen before it is cleared
const ERROR_DISPLAY: Duration = Duration::from_secs(5);

/// Effects handler that executes side effects based on actions
pub struct Effects {
    dispatcher: Dispatcher,
}

impl Effects {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handle an action and execute any necessary side effects
    pub fn handle(&self, action: &Action) {
        match action {
            Action::LoadEvents(path) => {
                self.load_events(path.clone());
            }
            Action::ShowError(_) | Action::EventsLoadFailed(_) => {
                self.clear_error_later();
            }
            _ => {}
        }
    }

    /// Read the events file off the UI thread
    fn load_events(&self, path: PathBuf) {
        let dispatcher = self.dispatcher.clone();

        task::spawn(async move {
            log::info!("Loading events from {}", path.display());
            let result = task::spawn_blocking(move || load_events(&path)).await;

            match result {
                Ok(Ok(events)) => {
                    log::info!("Loaded {} events", events.len());
                    dispatcher.dispatch(Action::EventsLoaded(events));
                }
                Ok(Err(e)) => {
                    log::error!("Failed to load events: {}", e);
                    dispatcher.dispatch(Action::EventsLoadFailed(e.to_string()));
                }
                Err(e) => {
                    log::error!("Events loader task failed: {}", e);
                    dispatcher.dispatch(Action::EventsLoadFailed(e.to_string()));
                }
            }
        });
    }

    fn clear_error_later(&self) {
        let dispatcher = self.dispatcher.clone();
        task::spawn(async move {
            tokio::time::sleep(ERROR_DISPLAY).await;
            dispatcher.dispatch(Action::ClearError);
        });
    }
}
