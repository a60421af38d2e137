/// Date helpers shared by the picker and the CLI.
///
/// Callers hand the picker date-only values, but selections are emitted as
/// timestamps that keep the time of day of the previous selection. Everything
/// here is timezone-unaware: `NaiveDate` in, `NaiveDateTime` out.
use crate::exceptions::GenericError;
use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Format of every timestamp handed to callers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse either a full timestamp, a minute-precision timestamp or a bare
/// date (which maps to midnight).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, GenericError> {
    let trimmed = input.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, MINUTE_FORMAT) {
        return Ok(dt);
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(d) => Ok(d.and_time(NaiveTime::MIN)),
        Err(e) => Err(GenericError::ParseError(format!(
            "'{}' is neither a date nor a timestamp: {}",
            trimmed, e
        ))),
    }
}

/// Parse a `YYYY-MM` month into its first day
pub fn parse_month(input: &str) -> Result<NaiveDate, GenericError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{trimmed}-01"), DATE_FORMAT).map_err(|e| {
        GenericError::ParseError(format!("'{}' is not a YYYY-MM month: {}", trimmed, e))
    })
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// The current wall-clock moment without zone information
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Put `day` together with the hours and minutes of `prior`, or of `now`
/// when nothing was selected before. Seconds are always zero.
pub fn combine_with_time_of_day(
    day: NaiveDate,
    prior: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> NaiveDateTime {
    let source = prior.unwrap_or(now);
    let time = NaiveTime::from_hms_opt(source.hour(), source.minute(), 0).unwrap_or(NaiveTime::MIN);
    day.and_time(time)
}

/// Timestamp string emitted when `day` gets picked
pub fn selection_timestamp(
    day: NaiveDate,
    prior: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> String {
    format_timestamp(&combine_with_time_of_day(day, prior, now))
}

/// Timestamp string emitted when the visible month changes: midnight on the
/// first of that month.
pub fn month_preview_timestamp(month: NaiveDate) -> String {
    format_timestamp(&first_of_month(month).and_time(NaiveTime::MIN))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from `date`
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let start = first_of_month(date);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        start.checked_add_months(months)
    } else {
        start.checked_sub_months(months)
    };
    shifted.unwrap_or(start)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = first_of_month(date);
    match start.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(start).num_days() as u32,
        None => 31,
    }
}

/// Every day of the month containing `date`, in order
pub fn month_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = first_of_month(date);
    start.iter_days().take(days_in_month(start) as usize).collect()
}
