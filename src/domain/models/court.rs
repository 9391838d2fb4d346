use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Operating hours for a single weekday. `end` numerically at or before
/// `start` means the window wraps past midnight into the next day.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DayHours {
    pub is_open: bool,
    pub start: String,
    pub end: String,
}

impl Default for DayHours {
    fn default() -> Self {
        Self {
            is_open: false,
            start: "00:00".to_string(),
            end: "00:00".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeekSchedule {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl WeekSchedule {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Court {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub session_duration_min: i32,
    pub session_price_cents: i64,
    pub currency: String,
    pub schedule_json: String,
    pub created_at: DateTime<Utc>,
}

impl Court {
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }

    pub fn week_schedule(&self) -> WeekSchedule {
        serde_json::from_str(&self.schedule_json).unwrap_or_default()
    }
}
