use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::models::court::Court;

pub const MINUTES_PER_DAY: i64 = 1440;

/// A candidate reservable window derived from a court's weekly schedule.
/// Never persisted; identity is `(court_id, date, start_min)`. For wrapped
/// (overnight) windows `start_min` is normalized into `[0, 1440)` while
/// `starts_at` keeps the concrete instant, which may fall on the next
/// calendar day.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Slot {
    pub court_id: String,
    pub date: NaiveDate,
    pub start_min: i32,
    pub duration_min: i32,
    pub starts_at: DateTime<Utc>,
}

impl Slot {
    pub fn start_label(&self) -> String {
        format!("{:02}:{:02}", self.start_min / 60, self.start_min % 60)
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(self.duration_min as i64)
    }
}

pub fn parse_hhmm(value: &str) -> Option<i64> {
    let t = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some((t.hour() * 60 + t.minute()) as i64)
}

/// Expands a court's operating hours for `date` into the ordered sequence of
/// bookable start times. Pure and deterministic: identical inputs always
/// produce an identical, ascending-by-instant sequence.
///
/// A closed weekday and a window too small for one full session both yield
/// an empty list, never an error. On today and past dates, slots starting
/// at or before `now + buffer_min` are dropped; future dates are
/// unfiltered.
pub fn resolve_slots(court: &Court, date: NaiveDate, now: DateTime<Utc>, buffer_min: i64) -> Vec<Slot> {
    let tz: Tz = court.tz();
    let schedule = court.week_schedule();
    let day = schedule.for_weekday(date.weekday());

    if !day.is_open {
        return Vec::new();
    }

    let duration = court.session_duration_min as i64;
    if duration <= 0 {
        return Vec::new();
    }

    let (Some(start), Some(mut end)) = (parse_hhmm(&day.start), parse_hhmm(&day.end)) else {
        return Vec::new();
    };
    if end <= start {
        end += MINUTES_PER_DAY;
    }

    let today_local = now.with_timezone(&tz).date_naive();
    let cutoff = now + Duration::minutes(buffer_min);
    let midnight = date.and_hms_opt(0, 0, 0).unwrap();

    let mut slots = Vec::new();
    let mut cursor = start;
    while cursor + duration <= end {
        let naive = midnight + Duration::minutes(cursor);
        // Skipped or ambiguous local times (DST) produce no slot.
        if let Some(local) = tz.from_local_datetime(&naive).single() {
            let starts_at = local.with_timezone(&Utc);
            if date > today_local || starts_at > cutoff {
                slots.push(Slot {
                    court_id: court.id.clone(),
                    date,
                    start_min: (cursor % MINUTES_PER_DAY) as i32,
                    duration_min: court.session_duration_min,
                    starts_at,
                });
            }
        }
        cursor += duration;
    }

    slots
}
