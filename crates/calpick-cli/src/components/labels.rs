use super::options::{LocaleArgs, read_events};
use crate::models::DayLabel;
use calpick_core::dates::{month_days, parse_month};
use calpick_core::events::count_on_day;
use calpick_core::{CalendarEvent, GenericError, Locale};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Print the accessible label of every day of a month, as the picker
/// announces them
#[derive(clap::Args, Debug)]
#[command(version, about, long_about = None)]
pub struct LabelArgs {
    /// Month to describe, as YYYY-MM
    #[arg(long, short, value_parser = parse_month)]
    pub month: NaiveDate,

    /// YAML events file. Defaults to CALPICK_EVENTS_FILE when that exists
    #[arg(long, short)]
    pub events: Option<PathBuf>,

    #[command(flatten)]
    pub locale: LocaleArgs,

    /// Print JSON instead of one line per day
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn day_labels(month: NaiveDate, events: &[CalendarEvent], locale: &Locale) -> Vec<DayLabel> {
    month_days(month)
        .into_iter()
        .map(|day| {
            let count = count_on_day(events, day);
            DayLabel {
                date: day.format("%Y-%m-%d").to_string(),
                events: count,
                label: locale.day_label(day, count),
            }
        })
        .collect()
}

pub fn format_labels(labels: &[DayLabel], json: bool) -> Result<String, GenericError> {
    if json {
        serde_json::to_string_pretty(labels).map_err(|e| {
            GenericError::RuntimeError(format!("Failed to serialise labels. Error: {}", e))
        })
    } else {
        Ok(labels
            .iter()
            .map(DayLabel::to_line)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub fn handle_labels(args: LabelArgs) -> Result<(), GenericError> {
    let locale = args.locale.resolve()?;
    let events = read_events(args.events.as_deref())?;
    log::info!(
        "Describing {} with {} events in locale {}",
        args.month.format("%Y-%m"),
        events.len(),
        locale.code()
    );
    let labels = day_labels(args.month, &events, &locale);
    println!("{}", format_labels(&labels, args.json)?);
    Ok(())
}
