/// Calendar events as seen by the picker.
///
/// The picker only ever looks at an event's date; the rest is carried along
/// for whoever owns the list.
use crate::dates::{format_timestamp, parse_timestamp};
use crate::exceptions::GenericError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

/// Anything that falls on a calendar day
pub trait Dated {
    fn date(&self) -> NaiveDateTime;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDateTime {
        (**self).date()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct CalendarEvent {
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub date: NaiveDateTime,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn new(date: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
            description: None,
        }
    }
}

impl Dated for CalendarEvent {
    fn date(&self) -> NaiveDateTime {
        self.date
    }
}

fn serialize_timestamp<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(dt))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(|e| serde::de::Error::custom(e.to_string()))
}

/// Events that fall on `day`, whatever their time of day. Order is kept.
pub fn events_on_day<E: Dated>(events: &[E], day: NaiveDate) -> Vec<&E> {
    events.iter().filter(|e| e.date().date() == day).collect()
}

pub fn count_on_day<E: Dated>(events: &[E], day: NaiveDate) -> usize {
    events.iter().filter(|e| e.date().date() == day).count()
}

/// Parse a YAML list of events
pub fn parse_events(contents: &str) -> Result<Vec<CalendarEvent>, GenericError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_norway::from_str::<Vec<CalendarEvent>>(contents).map_err(|e| {
        GenericError::ParseError(format!("Failed to parse events yaml. Error: {}", e))
    })
}

pub fn load_events(path: &Path) -> Result<Vec<CalendarEvent>, GenericError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        GenericError::IoError(format!(
            "Error reading events file {}. Error: {}",
            path.display(),
            e
        ))
    })?;
    let events = parse_events(&contents)?;
    log::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_events_on_day_ignores_time_of_day() {
        let events = vec![
            CalendarEvent::new(ts("2024-03-15T00:00:00"), "midnight"),
            CalendarEvent::new(ts("2024-03-14T23:59:59"), "day before"),
            CalendarEvent::new(ts("2024-03-15T23:59:59"), "last second"),
            CalendarEvent::new(ts("2024-04-15T12:00:00"), "next month"),
            CalendarEvent::new(ts("2023-03-15T12:00:00"), "last year"),
        ];
        let titles: Vec<&str> = events_on_day(&events, day(2024, 3, 15))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["midnight", "last second"]);
        assert_eq!(count_on_day(&events, day(2024, 3, 15)), 2);
    }

    #[test]
    fn test_events_on_day_every_day_partitions_list() {
        let events = vec![
            CalendarEvent::new(ts("2024-02-01T10:00:00"), "a"),
            CalendarEvent::new(ts("2024-02-01T11:00:00"), "b"),
            CalendarEvent::new(ts("2024-02-29T08:30:00"), "c"),
        ];
        let total: usize = crate::dates::month_days(day(2024, 2, 1))
            .into_iter()
            .map(|d| events_on_day(&events, d).len())
            .sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn test_empty_list() {
        let events: Vec<CalendarEvent> = Vec::new();
        assert!(events_on_day(&events, day(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_parse_events_yaml() {
        let yaml = r#"
- date: 2024-03-15T09:30:00
  title: Standup
- date: "2024-03-16"
  title: Release
  description: Ship 0.2
"#;
        let events = parse_events(yaml).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, ts("2024-03-15T09:30:00"));
        assert_eq!(events[1].date, ts("2024-03-16T00:00:00"));
        assert_eq!(events[1].description.as_deref(), Some("Ship 0.2"));
    }

    #[test]
    fn test_parse_events_bad_date() {
        let yaml = "- date: someday\n  title: Nope\n";
        assert!(matches!(parse_events(yaml), Err(GenericError::ParseError(_))));
    }

    #[test]
    fn test_load_events_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- date: 2024-05-01T12:00:00\n  title: Lunch").unwrap();
        let events = load_events(file.path()).unwrap();
        assert_eq!(events, vec![CalendarEvent::new(ts("2024-05-01T12:00:00"), "Lunch")]);
    }

    #[test]
    fn test_load_events_missing_file() {
        let err = load_events(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert!(matches!(err, GenericError::IoError(_)));
    }
}
