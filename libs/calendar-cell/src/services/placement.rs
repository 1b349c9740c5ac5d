// libs/calendar-cell/src/services/placement.rs
//
// Pure calendar geometry: the week/day/time grid, appointment placement and
// the drop-target occupancy rule. All inputs come from the caller; nothing
// here touches the store.

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use availability_cell::GeneratedSlot;
use shared_utils::weekday_name;

use crate::models::{Appointment, CalendarCell, CalendarDay, WeekGrid};

/// How far the calendar can be paged away from the current week, in weeks,
/// in each direction.
pub const WEEK_WINDOW: i64 = 3;

/// Hourly fallback rows used when the doctor has no generated slots to
/// derive rows from: 09:00 through 17:00.
pub fn default_time_slots() -> Vec<String> {
    (9..=17).map(|hour| format!("{:02}:00", hour)).collect()
}

/// Time rows derived from a doctor's generated slots: the distinct slot
/// start times in chronological order. Falls back to the hourly default when
/// no slots exist.
pub fn time_slots_from(slots: &[GeneratedSlot]) -> Vec<String> {
    let mut times: Vec<String> = slots.iter().map(|s| s.start_time.clone()).collect();
    times.sort();
    times.dedup();

    if times.is_empty() {
        default_time_slots()
    } else {
        times
    }
}

/// Monday of the week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Clamp a requested week to the navigable window around the current week.
/// Requests outside the window snap to the nearest edge, silently.
pub fn clamp_week_start(today: NaiveDate, requested: NaiveDate) -> NaiveDate {
    let current = week_start_of(today);
    let requested = week_start_of(requested);

    let earliest = current - Duration::weeks(WEEK_WINDOW);
    let latest = current + Duration::weeks(WEEK_WINDOW);

    requested.clamp(earliest, latest)
}

/// Lay a set of appointments onto the `(date, time)` grid of one week.
///
/// An appointment lands in the cell whose date and time row match its date
/// and start time exactly; anything outside the week or off the rows is
/// simply not shown. Cells stack freely - the single-occupancy rule is a
/// drop-time rule, not a placement rule.
pub fn build_week_grid(
    week_start: NaiveDate,
    time_slots: Vec<String>,
    appointments: &[Appointment],
) -> WeekGrid {
    let days = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let cells = time_slots
                .iter()
                .map(|time| CalendarCell {
                    time: time.clone(),
                    appointments: appointments
                        .iter()
                        .filter(|apt| {
                            apt.is_active() && apt.date == date && apt.start_time == *time
                        })
                        .cloned()
                        .collect(),
                })
                .collect();

            CalendarDay {
                date,
                day: weekday_name(date.weekday()).to_string(),
                cells,
            }
        })
        .collect();

    WeekGrid {
        week_start,
        time_slots,
        days,
    }
}

/// Whether a `(date, time)` cell is held by an active appointment other than
/// the one being moved. Dropping onto a cell you already occupy is not a
/// conflict.
pub fn occupied_by_other(
    appointments: &[Appointment],
    date: NaiveDate,
    time: &str,
    moving: Uuid,
) -> bool {
    appointments.iter().any(|apt| {
        apt.id != moving && apt.is_active() && apt.date == date && apt.start_time == time
    })
}
