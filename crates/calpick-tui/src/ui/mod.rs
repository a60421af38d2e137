/// UI module - panels and rendering components
pub mod agenda_panel;
pub mod layout;
pub mod log_panel;
pub mod popover;

pub use agenda_panel::AgendaPanel;
pub use layout::render_layout;
pub use log_panel::LogPanel;
pub use popover::PickerPopover;
