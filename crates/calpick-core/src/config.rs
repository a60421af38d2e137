/// Default values for the CALPICK env configs.
/// Each can be overridden by an ENV var of the same name and most of them
/// also from the command line. These should only be primitive types
///

/// locale code used for labels and text direction
pub static CALPICK_LOCALE: &'static str = "en";

/// YAML file holding the events shown in the calendar
pub static CALPICK_EVENTS_FILE: &'static str = "events.yml";

/// optional YAML locale catalog, overrides the built-in locale when set
pub static CALPICK_LOCALE_FILE: &'static str = "";

/// interval between terminal input polls in the picker app
pub static CALPICK_TICK_RATE_MS: usize = 16;

/// number of log lines retained by the in-memory logger
pub static CALPICK_LOG_BUFFER_LINES: usize = 50_000;
