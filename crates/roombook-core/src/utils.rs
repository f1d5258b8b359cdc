//! Date and time helpers shared by the classifier, search and forms

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Separator between start and end in a booking's `time` range
pub const TIME_RANGE_SEPARATOR: &str = " - ";

/// Strip a trailing `T...` time component from a backend date string
#[must_use]
pub fn date_part(date: &str) -> &str {
    date.split_once('T').map_or(date, |(day, _)| day)
}

fn parse_component(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse `YYYY-MM-DD` (any `T...` suffix ignored) into a calendar date.
///
/// Components are split on `-` and read as integers; anything beyond the
/// third component is ignored.
#[must_use]
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date_part(date).split('-');
    let year = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

/// Parse `HH:MM` into a time of day. Seconds, if present, are ignored.
#[must_use]
pub fn parse_time(time: &str) -> Option<NaiveTime> {
    let mut parts = time.split(':');
    let hour = parse_component(parts.next()?)?;
    let minute = parse_component(parts.next()?)?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Combine a backend date and an `HH:MM` time into a local wall-clock instant
#[must_use]
pub fn parse_local_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date)?.and_time(parse_time(time)?))
}

/// Resolve the end time of a booking: the explicit `end_time` when present and
/// non-blank, otherwise the second half of a `"HH:MM - HH:MM"` range.
#[must_use]
pub fn resolve_end_time<'a>(end_time: Option<&'a str>, time_range: &'a str) -> Option<&'a str> {
    if let Some(end) = end_time.filter(|t| !t.trim().is_empty()) {
        return Some(end);
    }

    let mut parts = time_range.split(TIME_RANGE_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(end), None) => Some(end),
        _ => None,
    }
}

/// Format a date the way the backend expects it
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
