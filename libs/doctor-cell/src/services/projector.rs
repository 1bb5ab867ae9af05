use chrono::{Datelike, Duration, NaiveDate};

use shared_models::time::{twelve_hour_label, weekday_name, TimeWindow};

use crate::models::DayAvailability;

/// Display stride between bookable slot starts.
const SLOT_STRIDE_MINUTES: i64 = 30;

/// Project a rolling 7-day calendar of bookable slots for a doctor.
///
/// For each of the next 7 calendar days (today inclusive), a day is
/// included iff its weekday name is in the doctor's available set; within
/// a day, slot labels run on a 30-minute stride from the window start
/// while the slot start is strictly before the window end.
///
/// The projection is deterministic in (today, days, window) and is purely
/// advisory: it does not consult existing bookings. The booking validator
/// is the sole enforcement point for conflicts.
pub fn project_week(
    today: NaiveDate,
    available_days: &[String],
    window: &TimeWindow,
) -> Vec<DayAvailability> {
    (0..7)
        .filter_map(|offset| {
            let date = today + Duration::days(offset);
            let day = weekday_name(date.weekday());
            if !available_days.iter().any(|name| name == day) {
                return None;
            }
            Some(DayAvailability {
                date,
                day: day.to_string(),
                slots: slot_labels(window),
            })
        })
        .collect()
}

fn slot_labels(window: &TimeWindow) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = window.start;

    while current < window.end {
        labels.push(twelve_hour_label(current));
        let (next, wrapped) = current.overflowing_add_signed(Duration::minutes(SLOT_STRIDE_MINUTES));
        if wrapped != 0 {
            // Stepped past midnight; the window is done.
            break;
        }
        current = next;
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
        TimeWindow {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    fn weekdays() -> Vec<String> {
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    #[test]
    fn stride_covers_window_start_to_end() {
        let labels = slot_labels(&window((9, 0), (11, 0)));
        assert_eq!(labels, vec!["9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM"]);
    }

    #[test]
    fn partial_trailing_slot_start_is_still_offered() {
        // 10:45 < 11:00, so the label appears even though a full half hour
        // does not fit; the validator enforces the real duration bounds.
        let labels = slot_labels(&window((9, 45), (11, 0)));
        assert_eq!(labels, vec!["9:45 AM", "10:15 AM", "10:45 AM"]);
    }

    #[test]
    fn skips_days_outside_available_set() {
        // 2026-08-31 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let projected = project_week(monday, &weekdays(), &window((9, 0), (17, 0)));

        let days: Vec<&str> = projected.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
        assert_eq!(projected[0].date, monday);
        assert_eq!(projected[0].slots.len(), 16);
    }

    #[test]
    fn week_starting_midweek_wraps_the_weekend() {
        // 2026-09-04 is a Friday; the next 7 days include one weekend.
        let friday = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();
        let projected = project_week(friday, &weekdays(), &window((9, 0), (17, 0)));

        let days: Vec<&str> = projected.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Friday", "Monday", "Tuesday", "Wednesday", "Thursday"]);
    }

    #[test]
    fn empty_day_set_projects_nothing() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert!(project_week(monday, &[], &window((9, 0), (17, 0))).is_empty());
    }

    #[test]
    fn projection_is_deterministic() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let days = weekdays();
        let w = window((9, 0), (17, 0));
        assert_eq!(project_week(monday, &days, &w), project_week(monday, &days, &w));
    }
}
