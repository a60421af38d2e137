/// Cardinal plural categories, following the CLDR names
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

/// Category of the integer `n` for `language` (the part of a locale code
/// before any `-` or `_`). Unknown languages use the English rule.
pub fn plural_category(language: &str, n: u64) -> PluralCategory {
    match language {
        "fr" | "pt" => {
            if n <= 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        "ar" => match n {
            0 => PluralCategory::Zero,
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ => match n % 100 {
                3..=10 => PluralCategory::Few,
                11..=99 => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
        },
        "he" => match n {
            1 => PluralCategory::One,
            2 => PluralCategory::Two,
            _ => PluralCategory::Other,
        },
        "ru" | "uk" => {
            let (m10, m100) = (n % 10, n % 100);
            if m10 == 1 && m100 != 11 {
                PluralCategory::One
            } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "pl" => {
            let (m10, m100) = (n % 10, n % 100);
            if n == 1 {
                PluralCategory::One
            } else if (2..=4).contains(&m10) && !(12..=14).contains(&m100) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
        "ja" | "ko" | "zh" | "th" | "vi" => PluralCategory::Other,
        _ => {
            if n == 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
    }
}
