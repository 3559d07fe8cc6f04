//! Store round-trip tests against a file-backed SQLite database.

use chrono::{NaiveDate, NaiveTime};
use fitrs::models::{
    EventStatus, ExerciseInstance, ScheduleEvent, SetInstance, WeightEntry, WorkoutInstance,
};
use fitrs::store::Store;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> Store {
    Store::open(dir.path().join("fitrs.db")).unwrap()
}

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fitrs.db");

    {
        let store = Store::open(&path).unwrap();
        store
            .insert_weight(&WeightEntry {
                date: day(10),
                weight: dec!(180),
            })
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let history = store.weight_history(None, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].weight, dec!(180));
}

#[test]
fn test_event_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let event = ScheduleEvent {
        id: String::new(),
        title: "Leg day".to_string(),
        category_id: Some("strength".to_string()),
        start_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
        date: Some(day(20)),
        is_recurring: false,
        recurrence_days: None,
        status: EventStatus::Pending,
    };

    let id = store.insert_event(&event).unwrap();
    let loaded = store.event(&id).unwrap();

    assert_eq!(loaded.title, "Leg day");
    assert_eq!(loaded.date, Some(day(20)));
    assert!(!loaded.is_recurring);
    assert_eq!(loaded.end_time, NaiveTime::from_hms_opt(18, 45, 0).unwrap());
}

fn workout(date: NaiveDate, exercise_id: &str, sets: Vec<SetInstance>) -> WorkoutInstance {
    WorkoutInstance {
        id: String::new(),
        date,
        completed_at: date.and_hms_opt(18, 0, 0),
        status: EventStatus::Completed,
        exercises: vec![ExerciseInstance {
            id: String::new(),
            exercise_id: exercise_id.to_string(),
            name: exercise_id.to_string(),
            sets,
        }],
    }
}

#[test]
fn test_exercise_histories_one_session_per_workout() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let working = |w, r| SetInstance {
        weight: Some(w),
        reps: r,
        is_warmup: false,
    };

    store
        .insert_workout(&workout(day(1), "bench", vec![working(dec!(185), 5)]))
        .unwrap();
    store
        .insert_workout(&workout(
            day(8),
            "bench",
            vec![working(dec!(190), 5), working(dec!(190), 4)],
        ))
        .unwrap();

    let histories = store.exercise_histories().unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].exercise_id, "bench");
    assert_eq!(histories[0].sessions.len(), 2);
    assert_eq!(histories[0].sessions[0].date, day(1));
    assert_eq!(histories[0].sessions[1].sets.len(), 2);
}

#[test]
fn test_same_day_workouts_stay_separate_sessions() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let working = SetInstance {
        weight: Some(dec!(100)),
        reps: 10,
        is_warmup: false,
    };

    // Morning and evening workouts on the same date
    let mut morning = workout(day(15), "bench", vec![working.clone()]);
    morning.completed_at = day(15).and_hms_opt(7, 0, 0);
    let mut evening = workout(day(15), "bench", vec![working]);
    evening.completed_at = day(15).and_hms_opt(18, 0, 0);

    store.insert_workout(&morning).unwrap();
    store.insert_workout(&evening).unwrap();

    let sessions = store.exercise_history("bench").unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].date, day(15));
    assert_eq!(sessions[0].sets.len(), 1);
    assert_eq!(sessions[1].sets.len(), 1);

    // Each workout is its own session, so the volume record is 1000, not a
    // merged 2000
    let (records, _) = fitrs::strength::RecordTracker::new().analyze(&sessions);
    assert_eq!(records.max_volume.unwrap().volume, dec!(1000));
}

#[test]
fn test_workout_delete_cascades() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);

    let id = store
        .insert_workout(&workout(
            day(1),
            "bench",
            vec![SetInstance {
                weight: Some(dec!(185)),
                reps: 5,
                is_warmup: false,
            }],
        ))
        .unwrap();

    store.delete_workout(&id).unwrap();
    assert!(store.exercise_history("bench").unwrap().is_empty());
    assert!(store.workouts_between(day(1), day(1)).unwrap().is_empty());
}
