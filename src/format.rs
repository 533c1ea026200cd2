//! Date formatting capability.
//!
//! Long calendar style: numeric year, full month name, numeric day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::i18n::Locale;

/// Text produced for a date string that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

pub trait DateFormatter {
    fn format_long_date(&self, iso: &str, locale: Locale) -> String;
}

/// chrono-backed formatter. Dates render in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateFormatter;

impl DateFormatter for ChronoDateFormatter {
    fn format_long_date(&self, iso: &str, locale: Locale) -> String {
        let Some(date) = parse_date_time(iso) else {
            return INVALID_DATE.to_string();
        };
        let month = date.format_localized("%B", locale.calendar()).to_string();
        match locale {
            Locale::En => format!("{} {}, {}", month, date.day(), date.year()),
            Locale::Es => format!("{} de {} de {}", date.day(), month, date.year()),
        }
    }
}

/// ISO-8601 parse, normalized to UTC.
///
/// Accepts RFC 3339, offsets without a colon (`+0000`), local date-times
/// without an offset and bare calendar dates. The last two are read as UTC.
pub fn parse_date_time(iso: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(iso) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(d.and_utc());
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
