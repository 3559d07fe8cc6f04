//! Recurring-schedule event resolution
//!
//! Decides which events have an occurrence on a given calendar date. One-time
//! events match only their own date; recurring events match by weekday index,
//! with an empty weekday set meaning daily recurrence.
//!
//! Calendar dates are plain year/month/day values throughout. Date strings
//! are parsed by splitting on `-` and constructing the date from local
//! components; they must never be routed through a timestamp parser, which
//! anchors to UTC midnight and can shift the resolved day backward in
//! negative-UTC-offset timezones.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::ScheduleError;
use crate::models::ScheduleEvent;

/// Parse a `YYYY-MM-DD` string into a calendar date from its components.
pub fn parse_local_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    let invalid = || ScheduleError::InvalidDate {
        value: value.to_string(),
    };

    let mut parts = value.splitn(3, '-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse a `HH:MM` or `HH:MM:SS` string into a time of day.
pub fn parse_local_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime {
        value: value.to_string(),
    };

    let mut parts = value.splitn(3, ':');
    let hour: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let minute: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let second: u32 = match parts.next() {
        Some(p) => p.parse().map_err(|_| invalid())?,
        None => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

/// Weekday index with Sunday = 0, matching the stored recurrence encoding.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Decide whether `event` has an occurrence on `target`.
///
/// Non-recurring events match only their own date; an event missing its date
/// (an invariant violation) matches nothing. Recurring events with no
/// weekday restriction occur every day.
pub fn occurs_on(event: &ScheduleEvent, target: NaiveDate) -> bool {
    if !event.is_recurring {
        return event.date == Some(target);
    }

    match &event.recurrence_days {
        None => true,
        Some(days) if days.is_empty() => true,
        Some(days) => days.contains(&weekday_index(target)),
    }
}

/// Filter `events` down to those occurring on `target`, preserving input
/// order. Callers sort by start time separately.
pub fn events_for_date(events: &[ScheduleEvent], target: NaiveDate) -> Vec<ScheduleEvent> {
    events
        .iter()
        .filter(|e| occurs_on(e, target))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use chrono::Duration;

    fn event(date: Option<&str>, is_recurring: bool, days: Option<Vec<u8>>) -> ScheduleEvent {
        ScheduleEvent {
            id: "evt".to_string(),
            title: "Training".to_string(),
            category_id: None,
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            date: date.map(|d| parse_local_date(d).unwrap()),
            is_recurring,
            recurrence_days: days,
            status: EventStatus::Pending,
        }
    }

    #[test]
    fn test_parse_local_date() {
        let date = parse_local_date("2024-03-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_parse_local_date_rejects_garbage() {
        assert!(parse_local_date("2024/03/15").is_err());
        assert!(parse_local_date("not-a-date").is_err());
        assert!(parse_local_date("2024-13-01").is_err());
        assert!(parse_local_date("2024-02-30").is_err());
        assert!(parse_local_date("").is_err());
    }

    #[test]
    fn test_parse_local_time() {
        assert_eq!(
            parse_local_time("06:30:15").unwrap(),
            NaiveTime::from_hms_opt(6, 30, 15).unwrap()
        );
        assert_eq!(
            parse_local_time("18:45").unwrap(),
            NaiveTime::from_hms_opt(18, 45, 0).unwrap()
        );
        assert!(parse_local_time("25:00").is_err());
        assert!(parse_local_time("abc").is_err());
    }

    #[test]
    fn test_one_time_event_matches_only_its_date() {
        let e = event(Some("2024-03-15"), false, None);
        let target = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert!(occurs_on(&e, target));
        assert!(!occurs_on(&e, target - Duration::days(1)));
        assert!(!occurs_on(&e, target + Duration::days(1)));
    }

    #[test]
    fn test_one_time_event_without_date_matches_nothing() {
        let e = event(None, false, None);
        assert!(!occurs_on(&e, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn test_daily_recurrence_over_two_weeks() {
        let none_days = event(None, true, None);
        let empty_days = event(None, true, Some(vec![]));
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        for offset in 0..14 {
            let day = start + Duration::days(offset);
            assert!(occurs_on(&none_days, day));
            assert!(occurs_on(&empty_days, day));
        }
    }

    #[test]
    fn test_weekday_recurrence_mon_wed_fri() {
        let e = event(None, true, Some(vec![1, 3, 5]));
        // 2024-03-03 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();

        let expected = [false, true, false, true, false, true, false];
        for (offset, want) in expected.iter().enumerate() {
            let day = sunday + Duration::days(offset as i64);
            assert_eq!(occurs_on(&e, day), *want, "offset {}", offset);
        }
    }

    #[test]
    fn test_weekday_index_sunday_zero() {
        // 2024-03-03 is a Sunday, 2024-03-09 a Saturday
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()), 6);
    }

    #[test]
    fn test_events_for_date_preserves_order() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(); // Monday
        let mut a = event(Some("2024-03-04"), false, None);
        a.id = "a".to_string();
        let mut b = event(None, true, Some(vec![2, 4])); // Tue/Thu, filtered out
        b.id = "b".to_string();
        let mut c = event(None, true, Some(vec![1])); // Monday
        c.id = "c".to_string();

        let matched = events_for_date(&[a, b, c], target);
        let ids: Vec<&str> = matched.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
