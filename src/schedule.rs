//! Human-readable summary and next-run preview of the send schedule.
//!
//! Mirrors the server's cron trigger: daily at the configured time, weekly
//! on a weekday, monthly on a day of the month. An empty time means noon,
//! which is what the server falls back to. The server's scheduler runs on
//! Cairo wall-clock time, whatever the client's zone.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::types::{Frequency, Settings};
use crate::validate::{validate_month_day, validate_time, validate_weekday};

pub const SERVER_DEFAULT_TIME: &str = "12:00";

/// Zone the server's scheduler fires in.
pub const SERVER_TZ: Tz = chrono_tz::Africa::Cairo;

/// Summary line shown under the frequency step.
pub fn describe(settings: &Settings) -> String {
    let time = if settings.time.is_empty() {
        "the set time"
    } else {
        settings.time.as_str()
    };
    let day = settings.days.first().map(String::as_str);

    match settings.frequency {
        None => "No send frequency chosen".to_string(),
        Some(Frequency::Daily) => format!("The report will be sent daily at {}", time),
        Some(Frequency::Weekly) => format!(
            "The report will be sent weekly on {} at {}",
            day.unwrap_or("the set day"),
            time
        ),
        Some(Frequency::Monthly) => format!(
            "The report will be sent monthly on day {} at {}",
            day.unwrap_or("(not set)"),
            time
        ),
    }
}

fn send_time(settings: &Settings) -> Option<NaiveTime> {
    let text = if settings.time.is_empty() {
        SERVER_DEFAULT_TIME
    } else {
        settings.time.as_str()
    };
    validate_time(text).ok()?;
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}

/// Next moment strictly after `now` at which the server would send, or `None`
/// when the schedule is incomplete or invalid.
pub fn next_send_after(settings: &Settings, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let at = send_time(settings)?;
    let today = now.date();

    match settings.frequency? {
        Frequency::Daily => (0..=1)
            .map(|offset| (today + Duration::days(offset)).and_time(at))
            .find(|candidate| *candidate > now),
        Frequency::Weekly => {
            let day = settings.days.first()?;
            if day.is_empty() {
                return None;
            }
            validate_weekday(day).ok()?;
            let weekday: Weekday = day.parse().ok()?;
            (0..=7)
                .map(|offset| today + Duration::days(offset))
                .filter(|date| date.weekday() == weekday)
                .map(|date| date.and_time(at))
                .find(|candidate| *candidate > now)
        }
        Frequency::Monthly => {
            let day = settings.days.first()?;
            if day.is_empty() {
                return None;
            }
            validate_month_day(day).ok()?;
            let day: u32 = day.parse().ok()?;
            // Months without that day are skipped, as cron does.
            (0..=12)
                .filter_map(|offset| month_day(today, offset, day))
                .map(|date| date.and_time(at))
                .find(|candidate| *candidate > now)
        }
    }
}

/// Next send as the server sees it: `now` is moved onto Cairo wall-clock
/// time before the schedule is walked.
pub fn next_send_at(settings: &Settings, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
    let local_now = now.with_timezone(&SERVER_TZ).naive_local();
    let mut naive = next_send_after(settings, local_now)?;
    // A time skipped by a DST jump fires at the first valid minute after it.
    for _ in 0..=120 {
        if let Some(at) = SERVER_TZ.from_local_datetime(&naive).earliest() {
            return Some(at);
        }
        naive += Duration::minutes(1);
    }
    None
}

/// `next_send_at` formatted for display.
pub fn preview(settings: &Settings, now: DateTime<Utc>) -> Option<String> {
    next_send_at(settings, now)
        .map(|at| format!("{} (Cairo time)", at.format("%a %Y-%m-%d %H:%M")))
}

fn month_day(from: NaiveDate, months_ahead: u32, day: u32) -> Option<NaiveDate> {
    let index = from.month0() + months_ahead;
    let year = from.year() + (index / 12) as i32;
    NaiveDate::from_ymd_opt(year, index % 12 + 1, day)
}
