/// Flags shared by the subcommands
use calpick_core::events::load_events;
use calpick_core::{CalendarEvent, GenericError, Locale, get_calpick_setting};
use std::path::{Path, PathBuf};

/// Locale selection. Flags win over the CALPICK_LOCALE and
/// CALPICK_LOCALE_FILE env settings.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LocaleArgs {
    /// Built-in locale code: en, de, fr, ar or he
    #[arg(long, short)]
    pub locale: Option<String>,

    /// YAML locale catalog to use instead of a built-in locale
    #[arg(long)]
    pub locale_file: Option<PathBuf>,
}

impl LocaleArgs {
    pub fn resolve(&self) -> Result<Locale, GenericError> {
        let locale_file = self.locale_file.clone().or_else(|| {
            let setting = get_calpick_setting!(CALPICK_LOCALE_FILE);
            (!setting.is_empty()).then(|| PathBuf::from(setting))
        });
        if let Some(path) = locale_file {
            log::debug!("Loading locale catalog from {}", path.display());
            return Locale::load(&path);
        }
        let code = self
            .locale
            .clone()
            .unwrap_or_else(|| get_calpick_setting!(CALPICK_LOCALE));
        Ok(Locale::resolve(&code))
    }
}

/// Events file to read: the flag when given, otherwise the configured
/// default if it exists
pub fn events_path(flag: Option<&Path>) -> Option<PathBuf> {
    match flag {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(get_calpick_setting!(CALPICK_EVENTS_FILE));
            default.exists().then_some(default)
        }
    }
}

/// Read the events for `flag`. No file at all means no events.
pub fn read_events(flag: Option<&Path>) -> Result<Vec<CalendarEvent>, GenericError> {
    match events_path(flag) {
        Some(path) => load_events(&path),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calpick_core::TextDirection;
    use std::io::Write;

    #[test]
    fn test_locale_flag() {
        let args = LocaleArgs {
            locale: Some(String::from("he")),
            locale_file: None,
        };
        let locale = args.resolve().unwrap();
        assert_eq!(locale.code(), "he");
        assert_eq!(locale.direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_locale_file_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
code: en-GB
weekdays: [Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday]
months: [January, February, March, April, May, June, July, August, September, October, November, December]
long_date: "{weekday} {day} {month} {year}"
event_count:
  one: "There is 1 event."
  other: "There are {count} events."
prev_month: Previous month
next_month: Next month
"#,
        )
        .unwrap();
        let args = LocaleArgs {
            locale: Some(String::from("de")),
            locale_file: Some(file.path().to_path_buf()),
        };
        let locale = args.resolve().unwrap();
        assert_eq!(locale.code(), "en-GB");
    }

    #[test]
    fn test_missing_locale_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = LocaleArgs {
            locale: None,
            locale_file: Some(dir.path().join("nope.yml")),
        };
        assert!(matches!(args.resolve(), Err(GenericError::IoError(_))));
    }

    #[test]
    fn test_explicit_events_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("events.yml");
        assert_eq!(events_path(Some(&missing)), Some(missing.clone()));
        assert!(read_events(Some(&missing)).is_err());
    }
}
