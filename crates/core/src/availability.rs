//! Free/busy slot computation
//!
//! Converts a list of busy calendar intervals into the open intervals inside
//! a daily working window, across a horizon of calendar days in the window's
//! timezone.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use draftpilot_domain::{AvailableSlot, BusyInterval, WorkingWindow};
use tracing::debug;

/// Compute the gaps usable for a meeting of at least `min_duration_minutes`.
///
/// For each non-weekend day in `[now, now + days_ahead)` (dates taken in the
/// window's timezone), the working window is established, truncated to `now`
/// when the current moment falls inside it, and swept against that day's busy
/// intervals. A gap counts as a slot when it is `>= min_duration_minutes`
/// (inclusive boundary, compared in fractional minutes).
///
/// Busy intervals are matched to a day by their start date in the window's
/// timezone and sorted ascending by start time; intervals with equal starts
/// keep their input order (no secondary key is defined). Overlapping and
/// fully-contained intervals are handled because the sweep cursor only ever
/// advances.
///
/// The result is fully materialized and ordered ascending by start time,
/// within and across days. Callers rendering "top N slots" rely on that
/// ordering.
pub fn find_available_slots(
    busy: &[BusyInterval],
    now: DateTime<Utc>,
    days_ahead: u32,
    min_duration_minutes: i64,
    window: &WorkingWindow,
    weekend: &[Weekday],
) -> Vec<AvailableSlot> {
    let tz = window.timezone();
    let today = now.with_timezone(&tz).date_naive();
    let min_minutes = min_duration_minutes as f64;

    let mut slots = Vec::new();

    for offset in 0..u64::from(days_ahead) {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };

        if weekend.contains(&date.weekday()) {
            continue;
        }

        // A boundary that cannot be resolved in local time (DST gap) skips
        // the whole day rather than producing a half-window.
        let Some(window_start) = local_hour(date, window.start_hour(), tz) else {
            continue;
        };
        let Some(day_end) = local_hour(date, window.end_hour(), tz) else {
            continue;
        };

        if now >= day_end {
            continue;
        }

        // No slots in the past: start from the current moment when it falls
        // inside the window.
        let day_start = window_start.max(now);

        let mut day_busy: Vec<&BusyInterval> =
            busy.iter().filter(|b| b.start().with_timezone(&tz).date_naive() == date).collect();
        day_busy.sort_by_key(|b| b.start());

        debug!(%date, busy = day_busy.len(), "sweeping working window");

        let mut cursor = day_start;
        for interval in day_busy {
            if minutes_between(cursor, interval.start()) >= min_minutes {
                slots.push(AvailableSlot::new(cursor, interval.start()));
            }
            cursor = cursor.max(interval.end());
        }

        if minutes_between(cursor, day_end) >= min_minutes {
            slots.push(AvailableSlot::new(cursor, day_end));
        }
    }

    slots
}

/// Resolve a whole local hour on `date` to an instant, treating hour 24 as
/// midnight of the following day.
fn local_hour(date: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = if hour == 24 {
        date.checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?
    } else {
        date.and_hms_opt(hour, 0, 0)?
    };
    tz.from_local_datetime(&naive).earliest().map(|local| local.with_timezone(&Utc))
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}
