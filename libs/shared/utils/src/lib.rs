pub mod time;

pub use time::{format_time_12h, minutes_to_time, time_to_minutes, weekday_name, TimeParseError};
