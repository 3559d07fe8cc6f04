//! Integration tests covering cross-module workflows: schedule resolution
//! feeding the day-grid layout, and exercise histories feeding the reports.

use chrono::{NaiveDate, NaiveTime};
use fitrs::models::{EventStatus, NutritionEntry, NutritionTargets, ScheduleEvent, SetInstance, WeightEntry};
use fitrs::schedule::events_for_date;
use fitrs::stats::{pr_report, weight_progress, ExerciseHistory, ReportConfig};
use fitrs::strength::{estimate_one_rm, ExerciseSession, RecordTracker};
use fitrs::trends::TrendAnalyzer;
use fitrs::LayoutEngine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn event(id: &str, start: NaiveTime, end: NaiveTime, days: Option<Vec<u8>>) -> ScheduleEvent {
    ScheduleEvent {
        id: id.to_string(),
        title: id.to_string(),
        category_id: None,
        start_time: start,
        end_time: end,
        date: None,
        is_recurring: true,
        recurrence_days: days,
        status: EventStatus::Pending,
    }
}

#[test]
fn test_resolved_events_flow_into_layout() {
    // 2024-03-15 is a Friday (weekday index 5)
    let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    let events = vec![
        event("lift", time(6, 0), time(7, 0), Some(vec![1, 3, 5])),
        event("run", time(6, 30), time(7, 30), Some(vec![5])),
        event("yoga", time(18, 0), time(19, 0), Some(vec![0, 6])),
    ];

    let resolved = events_for_date(&events, friday);
    assert_eq!(resolved.len(), 2);

    let engine = LayoutEngine::new();
    let positions = engine.assign_columns(&resolved);

    // lift and run overlap, so both are in a two-column group
    let lift = positions.iter().find(|p| p.event_id == "lift").unwrap();
    let run = positions.iter().find(|p| p.event_id == "run").unwrap();
    assert_eq!(lift.total_columns, 2);
    assert_eq!(run.total_columns, 2);
    assert_ne!(lift.column, run.column);

    // 6:00 on a 5:00 grid at 80px/hour
    assert_eq!(lift.top, 80.0);
    assert_eq!(lift.height, 80.0);
}

#[test]
fn test_one_time_event_only_on_its_date() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let one_time = ScheduleEvent {
        id: "pt".to_string(),
        title: "PT session".to_string(),
        category_id: None,
        start_time: time(10, 0),
        end_time: time(11, 0),
        date: Some(date),
        is_recurring: false,
        recurrence_days: None,
        status: EventStatus::Pending,
    };

    assert_eq!(events_for_date(std::slice::from_ref(&one_time), date).len(), 1);
    assert!(events_for_date(
        std::slice::from_ref(&one_time),
        date.succ_opt().unwrap()
    )
    .is_empty());
}

fn session(date: NaiveDate, weight: Decimal, reps: u32) -> ExerciseSession {
    ExerciseSession {
        date,
        sets: vec![SetInstance {
            weight: Some(weight),
            reps,
            is_warmup: false,
        }],
    }
}

#[test]
fn test_pr_pipeline_from_history_to_report() {
    let day = |n| NaiveDate::from_ymd_opt(2024, 3, n).unwrap();

    let histories = vec![
        ExerciseHistory {
            exercise_id: "bench".to_string(),
            name: "Bench Press".to_string(),
            sessions: vec![session(day(1), dec!(185), 5), session(day(20), dec!(200), 5)],
        },
        ExerciseHistory {
            exercise_id: "squat".to_string(),
            name: "Back Squat".to_string(),
            sessions: vec![session(day(5), dec!(275), 5)],
        },
    ];

    let report = pr_report(&histories, &RecordTracker::new(), &ReportConfig::default());

    // Squat's estimated 1RM (321) beats bench's (233), so it leads
    assert_eq!(report.prs[0].exercise, "Back Squat");
    assert_eq!(
        report.prs[0].records.estimated_one_rm.as_ref().unwrap().value,
        estimate_one_rm(dec!(275), 5)
    );

    // The bench jump on day 20 displaced a 19-day-old record
    assert!(report
        .recent_prs
        .iter()
        .any(|pr| pr.exercise == "Bench Press" && pr.date == day(20)));
}

#[test]
fn test_weight_progress_projects_goal_date() {
    let day = |n| NaiveDate::from_ymd_opt(2024, 3, n).unwrap();

    // Losing 1/week, 6 to go: about 6 weeks out
    let history = vec![
        WeightEntry {
            date: day(1),
            weight: dec!(180),
        },
        WeightEntry {
            date: day(15),
            weight: dec!(178),
        },
    ];

    let progress = weight_progress(&history, Some(dec!(172)), &TrendAnalyzer::new(), day(15));
    let goal = progress.goal.unwrap();
    assert_eq!(goal.remaining, dec!(6));
    assert_eq!(
        goal.estimated_date,
        Some(day(15) + chrono::Duration::days(42))
    );
}

#[test]
fn test_nutrition_summary_against_targets() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let entries = vec![
        NutritionEntry {
            date,
            calories: dec!(1000),
            protein: dec!(80),
            carbs: dec!(100),
            fat: dec!(30),
        },
        NutritionEntry {
            date,
            calories: dec!(800),
            protein: dec!(70),
            carbs: dec!(80),
            fat: dec!(25),
        },
    ];

    let summary = fitrs::nutrition::daily_summary(&entries, &NutritionTargets::default());
    assert_eq!(summary.consumed.calories, dec!(1800));
    assert_eq!(summary.remaining.calories, dec!(600));
    assert_eq!(summary.remaining.protein, dec!(30));
    // percentComplete is a 0..1 fraction
    assert_eq!(summary.percent_complete.calories, dec!(0.75));
}
