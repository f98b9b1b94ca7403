//! Weekly operating hours of a vendor.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schedule for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayHours {
    Closed,
    Open { open: NaiveTime, close: NaiveTime },
}

impl DayHours {
    /// Whether `time` falls inside the window, both ends inclusive.
    ///
    /// A window closing before it opens (`22:00`–`02:00`) spans midnight.
    pub fn contains(&self, time: NaiveTime) -> bool {
        match *self {
            Self::Closed => false,
            Self::Open { open, close } if open <= close => open <= time && time <= close,
            Self::Open { open, close } => time >= open || time <= close,
        }
    }
}

/// Operating hours indexed by weekday, Monday first.
///
/// A day without an entry has no data; it is not the same as [`DayHours::Closed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    days: [Option<DayHours>; 7],
}

impl OperatingHours {
    pub fn set(&mut self, day: Weekday, hours: DayHours) {
        self.days[day.num_days_from_monday() as usize] = Some(hours);
    }

    pub fn with(mut self, day: Weekday, hours: DayHours) -> Self {
        self.set(day, hours);
        self
    }

    pub fn get(&self, day: Weekday) -> Option<DayHours> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }

    /// Whether the vendor is open at the given local date and time.
    ///
    /// Fails open: a day with no configured hours counts as open, since
    /// missing data should not hide a vendor.
    ///
    /// Compared at whole-second precision, so `24:00` (stored as `23:59:59`)
    /// covers the last second of the day.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        let time = at.time();
        let time = time.with_nanosecond(0).unwrap_or(time);
        self.get(at.weekday())
            .is_none_or(|hours| hours.contains(time))
    }

    /// Parses the stored JSON form.
    ///
    /// Accepts an object keyed by weekday (`{"monday": {"open": "09:00",
    /// "close": "18:00"}}`) or a list of records carrying a `day` field.
    /// Unknown days and unparseable times are skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut hours = Self::default();

        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    if let (Some(day), Some(day_hours)) = (parse_weekday(key), parse_day(entry)) {
                        hours.set(day, day_hours);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter().filter_map(Value::as_object) {
                    let day = item.get("day").and_then(Value::as_str).and_then(parse_weekday);
                    if let (Some(day), Some(day_hours)) = (day, parse_record(item)) {
                        hours.set(day, day_hours);
                    }
                }
            }
            Value::String(s) => {
                if let Ok(decoded) = serde_json::from_str::<Value>(s)
                    && !decoded.is_string()
                {
                    return Self::from_json(&decoded);
                }
            }
            _ => {}
        }

        hours
    }
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    let day = match raw.trim().to_lowercase().as_str() {
        "monday" | "mon" | "lunes" => Weekday::Mon,
        "tuesday" | "tue" | "martes" => Weekday::Tue,
        "wednesday" | "wed" | "miercoles" | "miércoles" => Weekday::Wed,
        "thursday" | "thu" | "jueves" => Weekday::Thu,
        "friday" | "fri" | "viernes" => Weekday::Fri,
        "saturday" | "sat" | "sabado" | "sábado" => Weekday::Sat,
        "sunday" | "sun" | "domingo" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn parse_day(entry: &Value) -> Option<DayHours> {
    match entry {
        Value::Object(record) => parse_record(record),
        Value::Bool(false) => Some(DayHours::Closed),
        Value::String(s) if s.trim().eq_ignore_ascii_case("closed") => Some(DayHours::Closed),
        // "09:00-18:00"
        Value::String(s) => {
            let (open, close) = s.split_once('-')?;
            Some(DayHours::Open {
                open: parse_time(open)?,
                close: parse_time(close)?,
            })
        }
        _ => None,
    }
}

fn parse_record(record: &Map<String, Value>) -> Option<DayHours> {
    let flag = |names: &[&str]| names.iter().find_map(|n| record.get(*n)?.as_bool());

    if flag(&["closed", "is_closed", "isClosed"]) == Some(true)
        || flag(&["open_today", "is_open", "isOpen", "enabled"]) == Some(false)
    {
        return Some(DayHours::Closed);
    }

    let time = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| record.get(*n)?.as_str())
            .and_then(parse_time)
    };

    Some(DayHours::Open {
        open: time(&["open", "opens", "open_time", "openTime", "from"])?,
        close: time(&["close", "closes", "close_time", "closeTime", "to"])?,
    })
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw == "24:00" || raw == "24:00:00" {
        return NaiveTime::from_hms_opt(23, 59, 59);
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}
