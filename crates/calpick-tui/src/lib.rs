use calpick_core::Locale;
use chrono::NaiveDateTime;
use std::io;
use std::path::PathBuf;

// Widgets
pub mod calendar;
pub mod node_tree;
pub mod picker;

// Flux architecture modules for the picker app
mod actions;
mod app;
mod dispatcher;
mod effects;
mod keyboard;
mod logger;
mod stores;
mod tui;
mod ui;

pub use app::App;
pub use picker::{DatePicker, DatePickerProps, DatePickerState, ViewKey};

/// Startup options for the interactive picker
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    pub selected: Option<NaiveDateTime>,
    pub events_file: Option<PathBuf>,
    pub locale: Locale,
    /// Saturdays and Sundays cannot be picked
    pub block_weekends: bool,
}

/// Run the picker app until the user quits. Returns the last selected
/// timestamp, if any.
pub async fn tui_main(options: TuiOptions) -> io::Result<Option<String>> {
    // Install color-eyre for better error messages BEFORE terminal init
    if let Err(e) = color_eyre::install() {
        eprintln!("Warning: Failed to install color-eyre: {}", e);
    }

    // Create the application and action receiver (this initializes the logger)
    let (mut app, action_receiver) = App::new(options)
        .map_err(|e| io::Error::other(format!("Failed to initialize application: {}", e)))?;

    let result = {
        let mut session = tui::TuiSession::start()?;
        app.run(&mut session, action_receiver).await
    };

    result.map(|()| app.selection())
}
