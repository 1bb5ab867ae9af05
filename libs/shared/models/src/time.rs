use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Serde codec for minute-granularity wall-clock times carried on the wire
/// as 24-hour "HH:MM" strings. Seconds-bearing values are tolerated on read.
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Canonical English weekday names, Monday first, as stored in a doctor's
/// `availableDays`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// 12-hour clock label, e.g. "9:00 AM" or "4:30 PM".
pub fn twelve_hour_label(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// A doctor's single daily availability interval. Invariant: start < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "serde_hhmm")]
    pub start: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Whether the slot lies inside the window, endpoints included.
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.start <= slot.start && slot.end <= self.end
    }
}

/// A booked or requested (start, end) pair, minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "serde_hhmm")]
    pub start: NaiveTime,
    #[serde(with = "serde_hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }

    /// Half-open interval overlap: touching endpoints do NOT overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(start: NaiveTime, end: NaiveTime) -> TimeSlot {
        TimeSlot { start, end }
    }

    #[test]
    fn overlap_is_half_open() {
        let booked = slot(t(10, 0), t(10, 30));

        assert!(booked.overlaps(&slot(t(10, 15), t(10, 45))));
        assert!(booked.overlaps(&slot(t(9, 45), t(10, 15))));
        assert!(booked.overlaps(&slot(t(10, 0), t(10, 30))));

        // Touching endpoints are not an overlap.
        assert!(!booked.overlaps(&slot(t(10, 30), t(10, 50))));
        assert!(!booked.overlaps(&slot(t(9, 30), t(10, 0))));
    }

    #[test]
    fn window_contains_exact_boundaries() {
        let window = TimeWindow {
            start: t(9, 0),
            end: t(17, 0),
        };

        assert!(window.contains(&slot(t(9, 0), t(9, 45))));
        assert!(window.contains(&slot(t(16, 15), t(17, 0))));
        assert!(!window.contains(&slot(t(8, 45), t(9, 15))));
        assert!(!window.contains(&slot(t(16, 45), t(17, 15))));
    }

    #[test]
    fn duration_in_minutes() {
        assert_eq!(slot(t(10, 0), t(10, 30)).duration_minutes(), 30);
        assert_eq!(slot(t(10, 0), t(10, 46)).duration_minutes(), 46);
    }

    #[test]
    fn hhmm_round_trip() {
        let window: TimeWindow = serde_json::from_str(r#"{"start":"09:00","end":"17:00"}"#).unwrap();
        assert_eq!(window.start, t(9, 0));
        assert_eq!(
            serde_json::to_string(&window).unwrap(),
            r#"{"start":"09:00","end":"17:00"}"#
        );
    }

    #[test]
    fn weekday_names_and_labels() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(twelve_hour_label(t(9, 0)), "9:00 AM");
        assert_eq!(twelve_hour_label(t(12, 30)), "12:30 PM");
        assert_eq!(twelve_hour_label(t(0, 0)), "12:00 AM");
        assert_eq!(twelve_hour_label(t(16, 30)), "4:30 PM");
    }
}
