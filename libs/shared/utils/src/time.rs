//! Clock-string helpers shared by the scheduling and calendar cells.
//!
//! All schedule times travel as zero-padded 24-hour `"HH:MM"` strings, so
//! lexicographic and chronological order coincide. Parsing is strict: a
//! malformed string is a typed error, never a silently propagated junk value.

use chrono::Weekday;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("malformed clock string: {0:?}")]
    Malformed(String),

    #[error("clock value out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse `"HH:MM"` into minutes since midnight.
pub fn time_to_minutes(clock: &str) -> Result<u32, TimeParseError> {
    let (hours, minutes) = clock
        .split_once(':')
        .ok_or_else(|| TimeParseError::Malformed(clock.to_string()))?;

    let hours: u32 = hours
        .parse()
        .map_err(|_| TimeParseError::Malformed(clock.to_string()))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| TimeParseError::Malformed(clock.to_string()))?;

    if hours > 23 || minutes > 59 {
        return Err(TimeParseError::OutOfRange(clock.to_string()));
    }

    Ok(hours * 60 + minutes)
}

/// Render minutes since midnight as a zero-padded `"HH:MM"` string.
pub fn minutes_to_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Convert a 24-hour clock string to `"h:mm AM/PM"` display form.
///
/// Hour 0 renders as 12 AM, hour 12 as 12 PM, hours 13-23 drop into the
/// 1-11 PM range.
pub fn format_time_12h(clock: &str) -> Result<String, TimeParseError> {
    let total = time_to_minutes(clock)?;
    let hour = total / 60;
    let minute = total % 60;

    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        1..=12 => hour,
        _ => hour - 12,
    };

    Ok(format!("{}:{:02} {}", display_hour, minute, period))
}

/// Full weekday name for calendar column headers and notifications.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
