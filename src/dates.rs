//! Parsing and formatting for the log's `DD.MM.YYYY` dates and `HH:MM` times.

use crate::errors::ParseError;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = s.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let shaped = match parts.as_slice() {
        [day, month, year] => {
            is_digits(day, 1..=2) && is_digits(month, 1..=2) && is_digits(year, 4..=4)
        }
        _ => false,
    };
    if !shaped {
        return Err(ParseError::date(s));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ParseError::date(s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, ParseError> {
    let trimmed = s.trim();
    let shaped = match trimmed.split_once(':') {
        Some((hours, minutes)) => is_digits(hours, 1..=2) && is_digits(minutes, 2..=2),
        None => false,
    };
    if !shaped {
        return Err(ParseError::time(s));
    }
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|_| ParseError::time(s))
}

fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Orders date strings chronologically, keeping their original spelling.
///
/// Strings naming the same calendar day collapse onto the first one seen.
pub fn sort_distinct_dates<I, S>(dates: I) -> Result<Vec<String>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut by_date = BTreeMap::new();
    for raw in dates {
        let raw = raw.as_ref();
        let date = parse_date(raw)?;
        by_date.entry(date).or_insert_with(|| raw.to_string());
    }
    Ok(by_date.into_values().collect())
}

/// Combines a naive log timestamp with `tz`.
///
/// Ambiguous local times (autumn DST fold) take the earlier instant; times inside the
/// spring-forward gap are read one hour later.
pub fn localize(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Tz> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Formats whole hours and remaining minutes as `HH:MM`, rounding down.
pub fn format_hours_minutes(duration: Duration) -> String {
    let total = duration.num_seconds().div_euclid(60);
    let sign = if total < 0 { "-" } else { "" };
    let minutes = total.abs();
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}
