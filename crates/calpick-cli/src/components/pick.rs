use super::options::{LocaleArgs, events_path};
use calpick_core::GenericError;
use calpick_core::dates::parse_timestamp;
use calpick_tui::{TuiOptions, tui_main};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Open the interactive date picker. The last picked timestamp is printed
/// on exit.
#[derive(clap::Args, Debug)]
#[command(version, about, long_about = None)]
pub struct PickArgs {
    /// Initial value, as YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]
    #[arg(long, short, value_parser = parse_timestamp)]
    pub selected: Option<NaiveDateTime>,

    /// YAML events file. Defaults to CALPICK_EVENTS_FILE when that exists
    #[arg(long, short)]
    pub events: Option<PathBuf>,

    #[command(flatten)]
    pub locale: LocaleArgs,

    /// Saturdays and Sundays cannot be picked
    #[arg(long, default_value_t = false)]
    pub block_weekends: bool,
}

impl PickArgs {
    pub fn into_options(self) -> Result<TuiOptions, GenericError> {
        Ok(TuiOptions {
            selected: self.selected,
            events_file: events_path(self.events.as_deref()),
            locale: self.locale.resolve()?,
            block_weekends: self.block_weekends,
        })
    }
}

pub async fn handle_pick(args: PickArgs) -> Result<(), GenericError> {
    let options = args.into_options()?;
    let selection = tui_main(options)
        .await
        .map_err(|e| GenericError::RuntimeError(e.to_string()))?;
    if let Some(ts) = selection {
        println!("{}", ts);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_options() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.yml");
        let args = PickArgs {
            selected: parse_timestamp("2024-03-10").ok(),
            events: Some(events.clone()),
            locale: LocaleArgs {
                locale: Some(String::from("fr")),
                locale_file: None,
            },
            block_weekends: true,
        };
        let options = args.into_options().unwrap();
        assert_eq!(options.events_file, Some(events));
        assert_eq!(options.locale.code(), "fr");
        assert!(options.block_weekends);
        assert_eq!(
            options.selected.map(|s| s.to_string()).as_deref(),
            Some("2024-03-10 00:00:00")
        );
    }
}
