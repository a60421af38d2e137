pub mod config;
pub mod dates;
pub mod events;
pub mod exceptions;
pub mod i18n;
mod macros;

// public api
pub use events::{CalendarEvent, Dated, events_on_day};
pub use exceptions::GenericError;
pub use i18n::{Locale, TextDirection};
